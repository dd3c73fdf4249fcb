#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rigel_access::config::AccessConfig;
use rigel_access::memory::MemoryStore;
use rigel_access::session::Session;
use rigel_access::store::{
    GrantStore, InquiryStore, ProfileStore, PropertyStore, StoreError, StoreResult,
};
use rigel_access::AccessService;
use rigel_core::listing::PropertyStatus;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::profile::Profile;
use rigel_db::models::inquiry::{CreateInquiry, Inquiry, InquiryWithProject};
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};
use tokio::sync::Notify;

/// A memory store plus an access service wired to it.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub access: AccessService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(AccessConfig::default())
    }

    pub fn with_config(config: AccessConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let access = AccessService::new(Arc::clone(&store), config);
        Self { store, access }
    }

    pub async fn user(&self, email: &str, is_admin: bool, is_premium: bool) -> Session {
        seed_user(&self.store, email, is_admin, is_premium).await
    }

    pub async fn property(&self, title: &str) -> Property {
        self.store.seed_property(&property_input(title)).await
    }
}

pub async fn seed_user(
    store: &MemoryStore,
    email: &str,
    is_admin: bool,
    is_premium: bool,
) -> Session {
    let id = DbId::new_v4();
    store
        .seed_profile(Profile {
            id,
            email: email.to_string(),
            is_admin,
            is_premium,
            created_at: chrono::Utc::now(),
        })
        .await;
    Session::new(id, email)
}

pub fn property_input(title: &str) -> CreateProperty {
    CreateProperty {
        title: title.to_string(),
        area: "Glyfada".to_string(),
        price: 350_000.0,
        size: 120.0,
        bedrooms: 3,
        bathrooms: 2,
        status: PropertyStatus::Available,
        golden_visa: false,
        purchase_price: 100_000.0,
        transfer_fees: 4_000.0,
        renovation_cost: 6_000.0,
        selling_price: 150_000.0,
        images: Vec::new(),
        description: String::new(),
        completion_year: None,
    }
}

// ---------------------------------------------------------------------------
// Grant store doubles
// ---------------------------------------------------------------------------

/// Rendezvous points for a paused grant fetch.
#[derive(Default)]
pub struct Gate {
    /// Signalled when the fetch has started and is paused.
    pub started: Notify,
    /// Signal to let the paused fetch continue.
    pub release: Notify,
}

/// Delegates to a [`MemoryStore`], pausing the first `user_project_ids`
/// call on its [`Gate`].
pub struct GatedGrants {
    inner: Arc<MemoryStore>,
    gate: Arc<Gate>,
    armed: AtomicBool,
}

impl GatedGrants {
    pub fn new(inner: Arc<MemoryStore>, gate: Arc<Gate>) -> Self {
        Self {
            inner,
            gate,
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl GrantStore for GatedGrants {
    async fn user_project_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        // Read before pausing, so the result reflects the pre-switch state.
        let ids = self.inner.user_project_ids(user_id).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.gate.started.notify_one();
            self.gate.release.notified().await;
        }
        Ok(ids)
    }

    async fn user_grant_details(&self, user_id: DbId) -> StoreResult<Vec<UserGrantDetail>> {
        self.inner.user_grant_details(user_id).await
    }

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>> {
        self.inner.public_project_ids().await
    }

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>> {
        self.inner.projects_with_public_flag().await
    }

    async fn replace_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>> {
        self.inner.replace_user_grants(actor, user_id, project_ids).await
    }

    async fn grant_all_projects(
        &self,
        actor: DbId,
        user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>> {
        self.inner.grant_all_projects(actor, user_id).await
    }

    async fn revoke_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> StoreResult<u64> {
        self.inner.revoke_user_grants(actor, user_id, project_id).await
    }

    async fn upsert_public_access(
        &self,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>> {
        self.inner
            .upsert_public_access(actor, project_id, is_public)
            .await
    }
}

/// Every call fails with a backend error.
pub struct FailingGrants;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Backend("connection refused".into()))
}

#[async_trait]
impl GrantStore for FailingGrants {
    async fn user_project_ids(&self, _user_id: DbId) -> StoreResult<Vec<DbId>> {
        down()
    }

    async fn user_grant_details(&self, _user_id: DbId) -> StoreResult<Vec<UserGrantDetail>> {
        down()
    }

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>> {
        down()
    }

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>> {
        down()
    }

    async fn replace_user_grants(
        &self,
        _actor: DbId,
        _user_id: DbId,
        _project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>> {
        down()
    }

    async fn grant_all_projects(
        &self,
        _actor: DbId,
        _user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>> {
        down()
    }

    async fn revoke_user_grants(
        &self,
        _actor: DbId,
        _user_id: DbId,
        _project_id: Option<DbId>,
    ) -> StoreResult<u64> {
        down()
    }

    async fn upsert_public_access(
        &self,
        _actor: DbId,
        _project_id: DbId,
        _is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>> {
        down()
    }
}

/// Profile store whose every call fails with a backend error.
pub struct FailingProfiles;

#[async_trait]
impl ProfileStore for FailingProfiles {
    async fn find_profile(&self, _id: DbId) -> StoreResult<Option<Profile>> {
        down()
    }

    async fn ensure_profile(&self, _id: DbId, _email: &str) -> StoreResult<Profile> {
        down()
    }

    async fn list_profiles(&self, _actor: DbId) -> StoreResult<Vec<Profile>> {
        down()
    }

    async fn set_premium(
        &self,
        _actor: DbId,
        _target: DbId,
        _is_premium: bool,
    ) -> StoreResult<Option<Profile>> {
        down()
    }

    async fn set_admin(
        &self,
        _actor: DbId,
        _target: DbId,
        _is_admin: bool,
    ) -> StoreResult<Option<Profile>> {
        down()
    }
}

// ---------------------------------------------------------------------------
// Full store double
// ---------------------------------------------------------------------------

/// A [`MemoryStore`] whose `grant_all_projects` fails while `fail_grant_all`
/// is set. Everything else is delegated.
pub struct FlakyGrantAll {
    pub inner: Arc<MemoryStore>,
    pub fail_grant_all: AtomicBool,
}

impl FlakyGrantAll {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_grant_all: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl ProfileStore for FlakyGrantAll {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>> {
        self.inner.find_profile(id).await
    }

    async fn ensure_profile(&self, id: DbId, email: &str) -> StoreResult<Profile> {
        self.inner.ensure_profile(id, email).await
    }

    async fn list_profiles(&self, actor: DbId) -> StoreResult<Vec<Profile>> {
        self.inner.list_profiles(actor).await
    }

    async fn set_premium(
        &self,
        actor: DbId,
        target: DbId,
        is_premium: bool,
    ) -> StoreResult<Option<Profile>> {
        self.inner.set_premium(actor, target, is_premium).await
    }

    async fn set_admin(
        &self,
        actor: DbId,
        target: DbId,
        is_admin: bool,
    ) -> StoreResult<Option<Profile>> {
        self.inner.set_admin(actor, target, is_admin).await
    }
}

#[async_trait]
impl PropertyStore for FlakyGrantAll {
    async fn list_properties(&self) -> StoreResult<Vec<Property>> {
        self.inner.list_properties().await
    }

    async fn find_property(&self, id: DbId) -> StoreResult<Option<Property>> {
        self.inner.find_property(id).await
    }

    async fn create_property(&self, actor: DbId, input: &CreateProperty) -> StoreResult<Property> {
        self.inner.create_property(actor, input).await
    }

    async fn update_property(
        &self,
        actor: DbId,
        id: DbId,
        input: &UpdateProperty,
    ) -> StoreResult<Option<Property>> {
        self.inner.update_property(actor, id, input).await
    }

    async fn delete_property(&self, actor: DbId, id: DbId) -> StoreResult<bool> {
        self.inner.delete_property(actor, id).await
    }
}

#[async_trait]
impl GrantStore for FlakyGrantAll {
    async fn user_project_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        self.inner.user_project_ids(user_id).await
    }

    async fn user_grant_details(&self, user_id: DbId) -> StoreResult<Vec<UserGrantDetail>> {
        self.inner.user_grant_details(user_id).await
    }

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>> {
        self.inner.public_project_ids().await
    }

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>> {
        self.inner.projects_with_public_flag().await
    }

    async fn replace_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>> {
        self.inner
            .replace_user_grants(actor, user_id, project_ids)
            .await
    }

    async fn grant_all_projects(
        &self,
        actor: DbId,
        user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>> {
        if self.fail_grant_all.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        self.inner.grant_all_projects(actor, user_id).await
    }

    async fn revoke_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> StoreResult<u64> {
        self.inner.revoke_user_grants(actor, user_id, project_id).await
    }

    async fn upsert_public_access(
        &self,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>> {
        self.inner
            .upsert_public_access(actor, project_id, is_public)
            .await
    }
}

#[async_trait]
impl InquiryStore for FlakyGrantAll {
    async fn create_inquiry(&self, input: &CreateInquiry) -> StoreResult<Option<Inquiry>> {
        self.inner.create_inquiry(input).await
    }

    async fn list_inquiries(&self) -> StoreResult<Vec<InquiryWithProject>> {
        self.inner.list_inquiries().await
    }

    async fn project_inquiries(&self, project_id: DbId) -> StoreResult<Vec<Inquiry>> {
        self.inner.project_inquiries(project_id).await
    }
}
