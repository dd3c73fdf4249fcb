//! Handler for the public contact form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rigel_db::models::inquiry::{CreateInquiry, Inquiry};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/inquiries
///
/// Open to everyone, signed in or not.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(input): Json<CreateInquiry>,
) -> AppResult<(StatusCode, Json<DataResponse<Inquiry>>)> {
    let inquiry = state.access.inquiries.submit(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}
