//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.
//!
//! Privileged writes take the acting user's id and run inside a
//! transaction that first locks the actor's profile row and re-reads
//! `is_admin` (see [`lock_admin`]). The admin check and the write therefore
//! commit together; a concurrent demotion of the actor waits for the write
//! to finish instead of racing it.

pub mod grant_repo;
pub mod inquiry_repo;
pub mod profile_repo;
pub mod property_repo;

pub use grant_repo::{PublicAccessRepo, UserAccessRepo};
pub use inquiry_repo::InquiryRepo;
pub use profile_repo::ProfileRepo;
pub use property_repo::PropertyRepo;

use rigel_core::types::DbId;
use sqlx::{Postgres, Transaction};

/// Outcome of a call guarded by the actor's admin flag.
///
/// Used by privileged writes and by the admin-only roster read.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminWrite<T> {
    /// The actor was an admin and the call committed.
    Applied(T),
    /// The actor has no profile or is not an admin; nothing was read or written.
    Denied,
}

impl<T> AdminWrite<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AdminWrite<U> {
        match self {
            AdminWrite::Applied(value) => AdminWrite::Applied(f(value)),
            AdminWrite::Denied => AdminWrite::Denied,
        }
    }
}

/// Lock the actor's profile row for the rest of the transaction and report
/// whether the actor is an admin.
pub(crate) async fn lock_admin(
    tx: &mut Transaction<'_, Postgres>,
    actor: DbId,
) -> Result<bool, sqlx::Error> {
    let row: Option<(bool,)> =
        sqlx::query_as("SELECT is_admin FROM profiles WHERE id = $1 FOR SHARE")
            .bind(actor)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(matches!(row, Some((true,))))
}
