//! Handlers for the `/admin` resource.
//!
//! Every handler requires a session; the gateway decides whether the
//! caller is an administrator.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use rigel_access::gateway::RosterFilter;
use rigel_core::filter::AdminSearch;
use rigel_core::stats::PortfolioSummary;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::inquiry::InquiryWithProject;
use rigel_db::models::profile::Profile;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::parse_query;
use crate::handlers::properties::PropertyDetail;
use crate::middleware::auth::AuthSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for the premium and admin toggles.
#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub value: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceProjectsRequest {
    pub project_ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub removed: u64,
}

// ---------------------------------------------------------------------------
// Roster and roles
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    filter: Result<Query<RosterFilter>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let filter = parse_query(filter)?;
    let users = state
        .access
        .gateway
        .list_users(Some(&session), &filter)
        .await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}/premium
///
/// Turning premium on also grants every existing project.
pub async fn set_premium(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
    Json(body): Json<FlagRequest>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = state
        .access
        .gateway
        .set_premium(Some(&session), id, body.value)
        .await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/admin/users/{id}/admin
pub async fn set_admin(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
    Json(body): Json<FlagRequest>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = state
        .access
        .gateway
        .set_admin(Some(&session), id, body.value)
        .await?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Per-user grants
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users/{id}/projects
pub async fn user_projects(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserGrantDetail>>>> {
    let grants = state
        .access
        .gateway
        .user_grant_details(Some(&session), id)
        .await?;
    Ok(Json(DataResponse { data: grants }))
}

/// PUT /api/v1/admin/users/{id}/projects
pub async fn replace_user_projects(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
    Json(body): Json<ReplaceProjectsRequest>,
) -> AppResult<Json<DataResponse<Vec<UserProjectAccess>>>> {
    let grants = state
        .access
        .gateway
        .replace_user_grants(Some(&session), id, &body.project_ids)
        .await?;
    Ok(Json(DataResponse { data: grants }))
}

/// DELETE /api/v1/admin/users/{id}/projects
pub async fn revoke_all_projects(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RevokeResponse>>> {
    let removed = state
        .access
        .gateway
        .revoke_project_access(Some(&session), id, None)
        .await?;
    Ok(Json(DataResponse {
        data: RevokeResponse { removed },
    }))
}

/// DELETE /api/v1/admin/users/{id}/projects/{project_id}
pub async fn revoke_project(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path((id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<RevokeResponse>>> {
    let removed = state
        .access
        .gateway
        .revoke_project_access(Some(&session), id, Some(project_id))
        .await?;
    Ok(Json(DataResponse {
        data: RevokeResponse { removed },
    }))
}

// ---------------------------------------------------------------------------
// Public visibility
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects/visibility
pub async fn project_visibility(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> AppResult<Json<DataResponse<Vec<ProjectVisibility>>>> {
    let projects = state
        .access
        .gateway
        .projects_with_public_flag(Some(&session))
        .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// PUT /api/v1/admin/projects/{id}/visibility
pub async fn set_project_visibility(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
    Json(body): Json<VisibilityRequest>,
) -> AppResult<Json<DataResponse<PublicProjectAccess>>> {
    let row = state
        .access
        .gateway
        .set_public_access(Some(&session), id, body.is_public)
        .await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/properties
pub async fn search_properties(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    search: Result<Query<AdminSearch>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<PropertyDetail>>>> {
    let search = parse_query(search)?;
    let properties = state
        .access
        .gateway
        .search_properties(Some(&session), &search)
        .await?;
    Ok(Json(DataResponse {
        data: properties.into_iter().map(PropertyDetail::from).collect(),
    }))
}

/// GET /api/v1/admin/summary
pub async fn summary(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> AppResult<Json<DataResponse<PortfolioSummary>>> {
    let summary = state
        .access
        .gateway
        .portfolio_summary(Some(&session))
        .await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/admin/inquiries
pub async fn list_inquiries(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> AppResult<Json<DataResponse<Vec<InquiryWithProject>>>> {
    let inquiries = state.access.gateway.list_inquiries(Some(&session)).await?;
    Ok(Json(DataResponse { data: inquiries }))
}
