//! Route definitions for the `/properties` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::properties;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// Reads accept an optional session; writes require an admin session
/// (enforced by the mutation gateway).
///
/// ```text
/// GET    /                        -> list_properties
/// POST   /                        -> create_property
/// GET    /{id}                    -> get_property
/// PUT    /{id}                    -> update_property
/// DELETE /{id}                    -> delete_property
/// GET    /{id}/inquiries          -> project_inquiries
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(properties::list_properties).post(properties::create_property),
        )
        .route(
            "/{id}",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route("/{id}/inquiries", get(properties::project_inquiries))
}
