//! PostgreSQL store backend over the `rigel-db` repositories.

use async_trait::async_trait;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::inquiry::{CreateInquiry, Inquiry, InquiryWithProject};
use rigel_db::models::profile::Profile;
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};
use rigel_db::repositories::{
    AdminWrite, InquiryRepo, ProfileRepo, PropertyRepo, PublicAccessRepo, UserAccessRepo,
};
use rigel_db::DbPool;

use crate::store::{
    GrantStore, InquiryStore, ProfileStore, PropertyStore, StoreError, StoreResult,
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn applied<T>(write: AdminWrite<T>) -> StoreResult<T> {
    match write {
        AdminWrite::Applied(value) => Ok(value),
        AdminWrite::Denied => Err(StoreError::Denied),
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>> {
        Ok(ProfileRepo::find_by_id(&self.pool, id).await?)
    }

    async fn ensure_profile(&self, id: DbId, email: &str) -> StoreResult<Profile> {
        Ok(ProfileRepo::ensure(&self.pool, id, email).await?)
    }

    async fn list_profiles(&self, actor: DbId) -> StoreResult<Vec<Profile>> {
        applied(ProfileRepo::list_for_admin(&self.pool, actor).await?)
    }

    async fn set_premium(
        &self,
        actor: DbId,
        target: DbId,
        is_premium: bool,
    ) -> StoreResult<Option<Profile>> {
        applied(ProfileRepo::set_premium(&self.pool, actor, target, is_premium).await?)
    }

    async fn set_admin(
        &self,
        actor: DbId,
        target: DbId,
        is_admin: bool,
    ) -> StoreResult<Option<Profile>> {
        applied(ProfileRepo::set_admin(&self.pool, actor, target, is_admin).await?)
    }
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn list_properties(&self) -> StoreResult<Vec<Property>> {
        Ok(PropertyRepo::list(&self.pool).await?)
    }

    async fn find_property(&self, id: DbId) -> StoreResult<Option<Property>> {
        Ok(PropertyRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_property(&self, actor: DbId, input: &CreateProperty) -> StoreResult<Property> {
        applied(PropertyRepo::create(&self.pool, actor, input).await?)
    }

    async fn update_property(
        &self,
        actor: DbId,
        id: DbId,
        input: &UpdateProperty,
    ) -> StoreResult<Option<Property>> {
        applied(PropertyRepo::update(&self.pool, actor, id, input).await?)
    }

    async fn delete_property(&self, actor: DbId, id: DbId) -> StoreResult<bool> {
        applied(PropertyRepo::delete(&self.pool, actor, id).await?)
    }
}

#[async_trait]
impl GrantStore for PgStore {
    async fn user_project_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        Ok(UserAccessRepo::list_project_ids(&self.pool, user_id).await?)
    }

    async fn user_grant_details(&self, user_id: DbId) -> StoreResult<Vec<UserGrantDetail>> {
        Ok(UserAccessRepo::list_details(&self.pool, user_id).await?)
    }

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>> {
        Ok(PublicAccessRepo::list_public_ids(&self.pool).await?)
    }

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>> {
        Ok(PublicAccessRepo::list_projects_with_flag(&self.pool).await?)
    }

    async fn replace_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>> {
        applied(UserAccessRepo::replace_all(&self.pool, actor, user_id, project_ids).await?)
    }

    async fn grant_all_projects(
        &self,
        actor: DbId,
        user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>> {
        applied(UserAccessRepo::grant_all_projects(&self.pool, actor, user_id).await?)
    }

    async fn revoke_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> StoreResult<u64> {
        applied(UserAccessRepo::revoke(&self.pool, actor, user_id, project_id).await?)
    }

    async fn upsert_public_access(
        &self,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>> {
        applied(PublicAccessRepo::upsert(&self.pool, actor, project_id, is_public).await?)
    }
}

#[async_trait]
impl InquiryStore for PgStore {
    async fn create_inquiry(&self, input: &CreateInquiry) -> StoreResult<Option<Inquiry>> {
        Ok(InquiryRepo::create(&self.pool, input).await?)
    }

    async fn list_inquiries(&self) -> StoreResult<Vec<InquiryWithProject>> {
        Ok(InquiryRepo::list_all(&self.pool).await?)
    }

    async fn project_inquiries(&self, project_id: DbId) -> StoreResult<Vec<Inquiry>> {
        Ok(InquiryRepo::list_for_project(&self.pool, project_id).await?)
    }
}
