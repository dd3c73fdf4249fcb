//! Handler for `/me`: the caller's classified identity.

use axum::extract::State;
use axum::Json;
use rigel_access::identity::Identity;

use crate::error::AppResult;
use crate::middleware::auth::Viewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
///
/// Signed-in callers get a profile row on first sight; anonymous callers
/// are visitors.
pub async fn me(
    State(state): State<AppState>,
    viewer: Viewer,
) -> AppResult<Json<DataResponse<Identity>>> {
    let identity = match viewer.session() {
        Some(session) => state.access.resolver.sign_in(session).await,
        None => state.access.resolver.identify(None).await,
    };
    Ok(Json(DataResponse { data: identity }))
}
