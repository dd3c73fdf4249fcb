//! Handlers for the `/properties` resource.
//!
//! Reads are open to everyone and annotated per viewer. Only accessible
//! listings carry their full details; blurred ones expose just enough for
//! a teaser card. Writes go through the mutation gateway.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rigel_access::identity::Identity;
use rigel_core::error::CoreError;
use rigel_core::filter::ListingFilter;
use rigel_core::images::main_image_url;
use rigel_core::listing::Listing;
use rigel_core::stats::ListingStats;
use rigel_core::types::DbId;
use rigel_core::visibility::{ReasonTag, ResolvedListing};
use rigel_db::models::inquiry::Inquiry;
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::parse_query;
use crate::middleware::auth::{AuthSession, Viewer};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A property with its derived ROI.
#[derive(Debug, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub roi: f64,
}

impl From<Property> for PropertyDetail {
    fn from(property: Property) -> Self {
        let roi = property.roi();
        Self { property, roi }
    }
}

/// One card on the listings page.
#[derive(Debug, Serialize)]
pub struct ListingEntry {
    pub id: DbId,
    pub title: String,
    pub area: String,
    pub main_image: String,
    pub is_accessible: bool,
    pub is_blurred: bool,
    pub reason: ReasonTag,
    /// Present only when `is_accessible`.
    pub property: Option<PropertyDetail>,
}

impl From<ResolvedListing<Property>> for ListingEntry {
    fn from(resolved: ResolvedListing<Property>) -> Self {
        let p = &resolved.property;
        let mut entry = Self {
            id: p.id,
            title: p.title.clone(),
            area: p.area.clone(),
            main_image: main_image_url(&p.images).to_string(),
            is_accessible: resolved.is_accessible,
            is_blurred: resolved.is_blurred,
            reason: resolved.reason,
            property: None,
        };
        if resolved.is_accessible {
            entry.property = Some(resolved.property.into());
        }
        entry
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub identity: Identity,
    pub listings: Vec<ListingEntry>,
    pub stats: ListingStats,
    pub areas: Vec<String>,
}

fn denied_message(reason: ReasonTag) -> &'static str {
    match reason {
        ReasonTag::SignUp => "Sign up to view this property",
        ReasonTag::Upgrade => "Upgrade to premium to view this property",
        ReasonTag::NoAccess => "You have not been granted access to this property",
        ReasonTag::Loading | ReasonTag::Visible => "This property is not accessible",
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/properties
///
/// Filtered listings annotated for the caller, accessible first.
pub async fn list_properties(
    State(state): State<AppState>,
    viewer: Viewer,
    filter: Result<Query<ListingFilter>, QueryRejection>,
) -> AppResult<Json<DataResponse<ListingsResponse>>> {
    let filter = parse_query(filter)?;
    let page = state
        .access
        .resolver
        .listings(viewer.session(), &filter)
        .await?;

    Ok(Json(DataResponse {
        data: ListingsResponse {
            identity: page.identity,
            listings: page.listings.into_iter().map(ListingEntry::from).collect(),
            stats: page.stats,
            areas: page.areas,
        },
    }))
}

/// GET /api/v1/properties/{id}
///
/// 403 with a call-to-action message when the caller may not see it.
pub async fn get_property(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PropertyDetail>>> {
    let resolved = state.access.resolver.listing(viewer.session(), id).await?;
    if !resolved.is_accessible {
        return Err(CoreError::PermissionDenied(denied_message(resolved.reason).into()).into());
    }
    Ok(Json(DataResponse {
        data: resolved.property.into(),
    }))
}

/// POST /api/v1/properties
pub async fn create_property(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(input): Json<CreateProperty>,
) -> AppResult<(StatusCode, Json<DataResponse<PropertyDetail>>)> {
    let property = state
        .access
        .gateway
        .create_property(Some(&session), input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: property.into(),
        }),
    ))
}

/// PUT /api/v1/properties/{id}
pub async fn update_property(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProperty>,
) -> AppResult<Json<DataResponse<PropertyDetail>>> {
    let property = state
        .access
        .gateway
        .update_property(Some(&session), id, input)
        .await?;
    Ok(Json(DataResponse {
        data: property.into(),
    }))
}

/// DELETE /api/v1/properties/{id}
pub async fn delete_property(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state
        .access
        .gateway
        .delete_property(Some(&session), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/properties/{id}/inquiries
pub async fn project_inquiries(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Inquiry>>>> {
    let inquiries = state
        .access
        .gateway
        .project_inquiries(Some(&session), id)
        .await?;
    Ok(Json(DataResponse { data: inquiries }))
}
