//! Profile entity model.

use rigel_core::roles::RoleFlags;
use rigel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table. `id` is the auth provider's user id.
///
/// Role flags are only ever changed through the admin write path; a user
/// never edits their own profile flags.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub is_admin: bool,
    pub is_premium: bool,
    pub created_at: Timestamp,
}

impl Profile {
    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags {
            is_admin: self.is_admin,
            is_premium: self.is_premium,
        }
    }
}
