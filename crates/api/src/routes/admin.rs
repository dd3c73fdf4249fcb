//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require an administrator (enforced by the mutation gateway).
///
/// ```text
/// GET    /users                               -> list_users
/// PUT    /users/{id}/premium                  -> set_premium
/// PUT    /users/{id}/admin                    -> set_admin
/// GET    /users/{id}/projects                 -> user_projects
/// PUT    /users/{id}/projects                 -> replace_user_projects
/// DELETE /users/{id}/projects                 -> revoke_all_projects
/// DELETE /users/{id}/projects/{project_id}    -> revoke_project
/// GET    /projects/visibility                 -> project_visibility
/// PUT    /projects/{id}/visibility            -> set_project_visibility
/// GET    /properties                          -> search_properties
/// GET    /summary                             -> summary
/// GET    /inquiries                           -> list_inquiries
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/premium", put(admin::set_premium))
        .route("/users/{id}/admin", put(admin::set_admin))
        .route(
            "/users/{id}/projects",
            get(admin::user_projects)
                .put(admin::replace_user_projects)
                .delete(admin::revoke_all_projects),
        )
        .route(
            "/users/{id}/projects/{project_id}",
            delete(admin::revoke_project),
        )
        .route("/projects/visibility", get(admin::project_visibility))
        .route(
            "/projects/{id}/visibility",
            put(admin::set_project_visibility),
        )
        .route("/properties", get(admin::search_properties))
        .route("/summary", get(admin::summary))
        .route("/inquiries", get(admin::list_inquiries))
}
