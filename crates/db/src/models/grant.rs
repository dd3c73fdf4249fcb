//! Grant relations: per-user project access and per-project public visibility.

use rigel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `user_project_access`. Its existence lets `user_id` view
/// `project_id` in full.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserProjectAccess {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub granted_by: Option<DbId>,
    pub granted_at: Timestamp,
}

/// A user's grant joined with the granted project's title and area.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserGrantDetail {
    pub project_id: DbId,
    pub granted_at: Timestamp,
    pub title: String,
    pub area: String,
}

/// A row from `public_project_access` (unique per project).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PublicProjectAccess {
    pub project_id: DbId,
    pub is_public: bool,
    pub made_public_by: Option<DbId>,
    pub made_public_at: Timestamp,
}

/// Every property with its public flag, `false` when no row exists.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProjectVisibility {
    pub id: DbId,
    pub title: String,
    pub area: String,
    pub is_public: bool,
}
