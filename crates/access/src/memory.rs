//! In-memory store backend.
//!
//! Mirrors the PostgreSQL backend's semantics (newest-first listings,
//! cascading deletes, replace-all grants, admin re-check inside the write)
//! under a single `RwLock`, so a write and its admin check are atomic here
//! too. Used by the test suites and for running the API without a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::inquiry::{CreateInquiry, Inquiry, InquiryWithProject};
use rigel_db::models::profile::Profile;
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::store::{
    GrantStore, InquiryStore, ProfileStore, PropertyStore, StoreError, StoreResult,
};

#[derive(Default)]
struct State {
    /// Insertion order; listed newest first.
    profiles: Vec<Profile>,
    properties: Vec<Property>,
    user_access: Vec<UserProjectAccess>,
    public_access: HashMap<DbId, PublicProjectAccess>,
    inquiries: Vec<Inquiry>,
}

impl State {
    fn require_admin(&self, actor: DbId) -> StoreResult<()> {
        match self.profiles.iter().find(|p| p.id == actor) {
            Some(profile) if profile.is_admin => Ok(()),
            _ => Err(StoreError::Denied),
        }
    }

    fn profile_mut(&mut self, id: DbId) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.id == id)
    }

    fn property(&self, id: DbId) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Replace the grant rows of `user_id` with `project_ids`.
    fn grant(
        &mut self,
        actor: DbId,
        user_id: DbId,
        project_ids: Vec<DbId>,
    ) -> Vec<UserProjectAccess> {
        self.user_access.retain(|row| row.user_id != user_id);

        let now = Utc::now();
        let rows: Vec<UserProjectAccess> = project_ids
            .into_iter()
            .map(|project_id| UserProjectAccess {
                id: DbId::now_v7(),
                user_id,
                project_id,
                granted_by: Some(actor),
                granted_at: now,
            })
            .collect();
        self.user_access.extend(rows.iter().cloned());
        rows
    }
}

/// Store backend holding everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile as-is, flags included.
    pub async fn seed_profile(&self, profile: Profile) {
        let mut state = self.state.write().await;
        state.profiles.retain(|p| p.id != profile.id);
        state.profiles.push(profile);
    }

    /// Insert a property without an acting admin.
    pub async fn seed_property(&self, input: &CreateProperty) -> Property {
        let property = new_property(input);
        self.state.write().await.properties.push(property.clone());
        property
    }
}

fn new_property(input: &CreateProperty) -> Property {
    Property {
        id: DbId::now_v7(),
        title: input.title.clone(),
        area: input.area.clone(),
        price: input.price,
        size: input.size,
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        status: input.status,
        golden_visa: input.golden_visa,
        purchase_price: input.purchase_price,
        transfer_fees: input.transfer_fees,
        renovation_cost: input.renovation_cost,
        selling_price: input.selling_price,
        images: Json(input.images.clone()),
        description: input.description.clone(),
        completion_year: input.completion_year,
        created_at: Utc::now(),
    }
}

fn apply_update(property: &mut Property, input: &UpdateProperty) {
    if let Some(title) = &input.title {
        property.title = title.clone();
    }
    if let Some(area) = &input.area {
        property.area = area.clone();
    }
    if let Some(price) = input.price {
        property.price = price;
    }
    if let Some(size) = input.size {
        property.size = size;
    }
    if let Some(bedrooms) = input.bedrooms {
        property.bedrooms = bedrooms;
    }
    if let Some(bathrooms) = input.bathrooms {
        property.bathrooms = bathrooms;
    }
    if let Some(status) = input.status {
        property.status = status;
    }
    if let Some(golden_visa) = input.golden_visa {
        property.golden_visa = golden_visa;
    }
    if let Some(v) = input.purchase_price {
        property.purchase_price = v;
    }
    if let Some(v) = input.transfer_fees {
        property.transfer_fees = v;
    }
    if let Some(v) = input.renovation_cost {
        property.renovation_cost = v;
    }
    if let Some(v) = input.selling_price {
        property.selling_price = v;
    }
    if let Some(images) = &input.images {
        property.images = Json(images.clone());
    }
    if let Some(description) = &input.description {
        property.description = description.clone();
    }
    if let Some(year) = input.completion_year {
        property.completion_year = Some(year);
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: DbId) -> StoreResult<Option<Profile>> {
        let state = self.state.read().await;
        Ok(state.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn ensure_profile(&self, id: DbId, email: &str) -> StoreResult<Profile> {
        let mut state = self.state.write().await;
        if let Some(profile) = state.profile_mut(id) {
            profile.email = email.to_string();
            return Ok(profile.clone());
        }
        let profile = Profile {
            id,
            email: email.to_string(),
            is_admin: false,
            is_premium: false,
            created_at: Utc::now(),
        };
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn list_profiles(&self, actor: DbId) -> StoreResult<Vec<Profile>> {
        let state = self.state.read().await;
        state.require_admin(actor)?;
        Ok(state.profiles.iter().rev().cloned().collect())
    }

    async fn set_premium(
        &self,
        actor: DbId,
        target: DbId,
        is_premium: bool,
    ) -> StoreResult<Option<Profile>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;
        Ok(state.profile_mut(target).map(|profile| {
            profile.is_premium = is_premium;
            profile.clone()
        }))
    }

    async fn set_admin(
        &self,
        actor: DbId,
        target: DbId,
        is_admin: bool,
    ) -> StoreResult<Option<Profile>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;
        Ok(state.profile_mut(target).map(|profile| {
            profile.is_admin = is_admin;
            if is_admin {
                profile.is_premium = true;
            }
            profile.clone()
        }))
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn list_properties(&self) -> StoreResult<Vec<Property>> {
        let state = self.state.read().await;
        Ok(state.properties.iter().rev().cloned().collect())
    }

    async fn find_property(&self, id: DbId) -> StoreResult<Option<Property>> {
        Ok(self.state.read().await.property(id).cloned())
    }

    async fn create_property(&self, actor: DbId, input: &CreateProperty) -> StoreResult<Property> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;
        let property = new_property(input);
        state.properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(
        &self,
        actor: DbId,
        id: DbId,
        input: &UpdateProperty,
    ) -> StoreResult<Option<Property>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;
        Ok(state
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .map(|property| {
                apply_update(property, input);
                property.clone()
            }))
    }

    async fn delete_property(&self, actor: DbId, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;

        let before = state.properties.len();
        state.properties.retain(|p| p.id != id);
        if state.properties.len() == before {
            return Ok(false);
        }
        state.user_access.retain(|row| row.project_id != id);
        state.public_access.remove(&id);
        state.inquiries.retain(|i| i.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn user_project_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        let state = self.state.read().await;
        Ok(state
            .user_access
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.project_id)
            .collect())
    }

    async fn user_grant_details(&self, user_id: DbId) -> StoreResult<Vec<UserGrantDetail>> {
        let state = self.state.read().await;
        let mut details: Vec<UserGrantDetail> = state
            .user_access
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| {
                state.property(row.project_id).map(|p| UserGrantDetail {
                    project_id: row.project_id,
                    granted_at: row.granted_at,
                    title: p.title.clone(),
                    area: p.area.clone(),
                })
            })
            .collect();
        details.sort_by(|a, b| {
            b.granted_at
                .cmp(&a.granted_at)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(details)
    }

    async fn public_project_ids(&self) -> StoreResult<Vec<DbId>> {
        let state = self.state.read().await;
        Ok(state
            .public_access
            .values()
            .filter(|row| row.is_public)
            .map(|row| row.project_id)
            .collect())
    }

    async fn projects_with_public_flag(&self) -> StoreResult<Vec<ProjectVisibility>> {
        let state = self.state.read().await;
        let mut projects: Vec<ProjectVisibility> = state
            .properties
            .iter()
            .map(|p| ProjectVisibility {
                id: p.id,
                title: p.title.clone(),
                area: p.area.clone(),
                is_public: state
                    .public_access
                    .get(&p.id)
                    .is_some_and(|row| row.is_public),
            })
            .collect();
        projects.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(projects)
    }

    async fn replace_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> StoreResult<Vec<UserProjectAccess>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;

        let mut seen = HashSet::new();
        let ids: Vec<DbId> = project_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id) && state.property(*id).is_some())
            .collect();
        Ok(state.grant(actor, user_id, ids))
    }

    async fn grant_all_projects(
        &self,
        actor: DbId,
        user_id: DbId,
    ) -> StoreResult<Vec<UserProjectAccess>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;

        let ids: Vec<DbId> = state.properties.iter().map(|p| p.id).collect();
        Ok(state.grant(actor, user_id, ids))
    }

    async fn revoke_user_grants(
        &self,
        actor: DbId,
        user_id: DbId,
        project_id: Option<DbId>,
    ) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;

        let before = state.user_access.len();
        state.user_access.retain(|row| {
            row.user_id != user_id || project_id.is_some_and(|pid| row.project_id != pid)
        });
        Ok((before - state.user_access.len()) as u64)
    }

    async fn upsert_public_access(
        &self,
        actor: DbId,
        project_id: DbId,
        is_public: bool,
    ) -> StoreResult<Option<PublicProjectAccess>> {
        let mut state = self.state.write().await;
        state.require_admin(actor)?;

        if state.property(project_id).is_none() {
            return Ok(None);
        }
        let row = PublicProjectAccess {
            project_id,
            is_public,
            made_public_by: Some(actor),
            made_public_at: Utc::now(),
        };
        state.public_access.insert(project_id, row.clone());
        Ok(Some(row))
    }
}

#[async_trait]
impl InquiryStore for MemoryStore {
    async fn create_inquiry(&self, input: &CreateInquiry) -> StoreResult<Option<Inquiry>> {
        let mut state = self.state.write().await;
        if state.property(input.project_id).is_none() {
            return Ok(None);
        }
        let inquiry = Inquiry {
            id: DbId::now_v7(),
            project_id: input.project_id,
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            message: input.message.clone(),
            created_at: Utc::now(),
        };
        state.inquiries.push(inquiry.clone());
        Ok(Some(inquiry))
    }

    async fn list_inquiries(&self) -> StoreResult<Vec<InquiryWithProject>> {
        let state = self.state.read().await;
        Ok(state
            .inquiries
            .iter()
            .rev()
            .map(|i| InquiryWithProject {
                id: i.id,
                project_id: i.project_id,
                full_name: i.full_name.clone(),
                email: i.email.clone(),
                phone: i.phone.clone(),
                message: i.message.clone(),
                created_at: i.created_at,
                project_title: state.property(i.project_id).map(|p| p.title.clone()),
            })
            .collect())
    }

    async fn project_inquiries(&self, project_id: DbId) -> StoreResult<Vec<Inquiry>> {
        let state = self.state.read().await;
        Ok(state
            .inquiries
            .iter()
            .rev()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }
}
