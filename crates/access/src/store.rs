//! Storage traits the access components are written against.
//!
//! Privileged writes take the acting user's id and must re-check that the
//! actor is an admin atomically with the write, returning
//! [`StoreError::Denied`] (and writing nothing) when they are not.

use async_trait::async_trait;
use rigel_core::error::CoreError;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::inquiry::{CreateInquiry, Inquiry, InquiryWithProject};
use rigel_db::models::profile::Profile;
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("actor is not an admin")]
    Denied,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(msg) => CoreError::Storage(msg),
            StoreError::Denied => CoreError::PermissionDenied("Admin privileges required".into()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>>;

    /// Create the profile on first sight of a session; refresh the email
    /// otherwise. Role flags are never touched.
    async fn ensure_profile(&self, id: DbId, email: &str) -> StoreResult<Profile>;

    /// Full roster, newest first. Fails with [`StoreError::Denied`] unless
    /// `actor` is an admin.
    async fn list_profiles(&self, actor: DbId) -> StoreResult<Vec<Profile>>;

    async fn set_premium(
        &self,
        actor: DbId,
        target: DbId,
        is_premium: bool,
    ) -> StoreResult<Option<Profile>>;

    /// Granting admin also sets premium.
    async fn set_admin(
        &self,
        actor: DbId,
        target: DbId,
        is_admin: bool,
    ) -> StoreResult<Option<Profile>>;
}

#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// All properties, newest first.
    async fn list_properties(&self) -> StoreResult<Vec<Property>>;

    async fn find_property(&self, id: DbId) -> StoreResult<Option<Property>>;

    async fn create_property(&self, actor: DbId, input: &CreateProperty) -> StoreResult<Property>;

    async fn update_property(
        &self,
        actor: DbId,
        id: DbId,
        input: &UpdateProperty,
    ) -> StoreResult<Option<Property>>;

    /// Removes the property together with its grants and inquiries.
    async fn delete_property(&self, actor: DbId, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait GrantStore: Send + Sync {
    async fn user_project_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>>;

    async fn user_grant_details(&self, user_id: DbId) -> StoreResult<Vec<UserGrantDetail>>;

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>>;

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>>;

    /// Replace every grant of `user_id`; readers see the old set or the new
    /// one, never a mix. Unknown project ids are skipped.
    async fn replace_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>>;

    /// Replace every grant of `user_id` with all properties existing now.
    async fn grant_all_projects(
        &self,
        actor: DbId,
        user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>>;

    /// Delete one grant, or all of them when `project_id` is `None`.
    async fn revoke_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> StoreResult<u64>;

    /// `None` when the project does not exist.
    async fn upsert_public_access(
        &self,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>>;
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    /// `None` when the referenced property does not exist.
    async fn create_inquiry(&self, input: &CreateInquiry) -> StoreResult<Option<Inquiry>>;

    async fn list_inquiries(&self) -> StoreResult<Vec<InquiryWithProject>>;

    async fn project_inquiries(&self, project_id: DbId) -> StoreResult<Vec<Inquiry>>;
}

/// A backend implementing every store trait.
pub trait Store: ProfileStore + PropertyStore + GrantStore + InquiryStore {}

impl<T> Store for T where T: ProfileStore + PropertyStore + GrantStore + InquiryStore {}
