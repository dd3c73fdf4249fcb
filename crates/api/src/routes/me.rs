//! Route definitions for `/me`.

use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /                        -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(me::me))
}
