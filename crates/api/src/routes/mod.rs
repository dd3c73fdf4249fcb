pub mod admin;
pub mod health;
pub mod inquiries;
pub mod me;
pub mod properties;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                               caller identity
///
/// /properties                                       annotated listings, create (admin)
/// /properties/{id}                                  detail, update, delete (admin)
/// /properties/{id}/inquiries                        inquiries for one property (admin)
///
/// /inquiries                                        submit (anyone)
///
/// /admin/users                                      roster (?search=&role=)
/// /admin/users/{id}/premium                         toggle premium (PUT)
/// /admin/users/{id}/admin                           toggle admin (PUT)
/// /admin/users/{id}/projects                        grant details, replace, revoke all
/// /admin/users/{id}/projects/{project_id}           revoke one (DELETE)
/// /admin/projects/visibility                        projects with public flag
/// /admin/projects/{id}/visibility                   set public flag (PUT)
/// /admin/properties                                 property table (?search=&status=)
/// /admin/summary                                    portfolio summary
/// /admin/inquiries                                  all inquiries
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/me", me::router())
        .nest("/properties", properties::router())
        .nest("/inquiries", inquiries::router())
        .nest("/admin", admin::router())
}
