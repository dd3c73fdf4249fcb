pub mod admin;
pub mod inquiries;
pub mod me;
pub mod properties;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;

use crate::error::{AppError, AppResult};

/// Unwrap a query string, turning a malformed one into a JSON 400.
pub(crate) fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
