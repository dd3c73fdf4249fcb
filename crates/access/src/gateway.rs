//! Privileged writes and admin reads.
//!
//! Every operation first re-reads the caller's profile: no session is
//! [`CoreError::AuthRequired`], a missing profile or `is_admin = false` is
//! [`CoreError::PermissionDenied`]. That check is a fast fail for the UI;
//! the store re-checks admin status inside the write itself, and row-level
//! security backs both. Committed writes are announced on the event bus.

use std::collections::HashSet;
use std::sync::Arc;

use rigel_core::error::CoreError;
use rigel_core::filter::AdminSearch;
use rigel_core::images::normalize_main;
use rigel_core::roles::{matches_role_filter, Tier};
use rigel_core::stats::PortfolioSummary;
use rigel_core::types::DbId;
use rigel_db::models::grant::{
    ProjectVisibility, PublicProjectAccess, UserGrantDetail, UserProjectAccess,
};
use rigel_db::models::inquiry::{Inquiry, InquiryWithProject};
use rigel_db::models::profile::Profile;
use rigel_db::models::property::{CreateProperty, Property, UpdateProperty};
use serde::Deserialize;
use validator::Validate;

use crate::events::{AccessChange, AccessEvent, AccessEventBus};
use crate::session::Session;
use crate::store::{GrantStore, InquiryStore, ProfileStore, PropertyStore, Store};

/// Admin user-table filter (`?search=&role=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterFilter {
    /// Case-insensitive substring of the email.
    pub search: Option<String>,
    pub role: Option<Tier>,
}

impl RosterFilter {
    pub fn matches(&self, profile: &Profile) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) if !term.is_empty() => profile
                .email
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let matches_role = self
            .role
            .map_or(true, |role| matches_role_filter(profile.role_flags(), role));
        matches_search && matches_role
    }
}

pub struct MutationGateway {
    profiles: Arc<dyn ProfileStore>,
    properties: Arc<dyn PropertyStore>,
    grants: Arc<dyn GrantStore>,
    inquiries: Arc<dyn InquiryStore>,
    events: Arc<AccessEventBus>,
}

impl MutationGateway {
    pub fn new<S: Store + 'static>(store: Arc<S>, events: Arc<AccessEventBus>) -> Self {
        Self {
            profiles: store.clone(),
            properties: store.clone(),
            grants: store.clone(),
            inquiries: store,
            events,
        }
    }

    /// Re-fetch the caller's profile and return their id if they are an
    /// admin.
    async fn require_admin(&self, session: Option<&Session>) -> Result<DbId, CoreError> {
        let session =
            session.ok_or_else(|| CoreError::AuthRequired("Sign in to continue".into()))?;

        match self.profiles.find_profile(session.user_id).await? {
            Some(profile) if profile.is_admin => Ok(profile.id),
            _ => {
                tracing::warn!(user_id = %session.user_id, "Rejected non-admin write");
                Err(CoreError::PermissionDenied(
                    "Admin privileges required".into(),
                ))
            }
        }
    }

    fn publish(&self, change: AccessChange, actor: DbId) {
        self.events.publish(AccessEvent::new(change, actor));
    }

    // ---------------------------------------------------------------------
    // Role flags
    // ---------------------------------------------------------------------

    /// Set or clear premium on `target`.
    ///
    /// Becoming premium replaces the target's grants with every property
    /// that exists at that moment; properties created later are not
    /// granted. Losing premium leaves the grants in place.
    ///
    /// Grants are written before the flag. If either write fails the stored
    /// flag is still `false`, so calling again redoes both.
    pub async fn set_premium(
        &self,
        session: Option<&Session>,
        target: DbId,
        is_premium: bool,
    ) -> Result<Profile, CoreError> {
        let actor = self.require_admin(session).await?;
        let before = self
            .profiles
            .find_profile(target)
            .await?
            .ok_or_else(|| CoreError::not_found("profile", target))?;

        if is_premium && !before.is_premium {
            let granted = self.grants.grant_all_projects(actor, target).await?;
            tracing::info!(
                target = %target,
                actor = %actor,
                granted = granted.len(),
                "Granted all projects on premium upgrade"
            );
            self.publish(AccessChange::UserGrants { user_id: target }, actor);
        }

        let profile = self
            .profiles
            .set_premium(actor, target, is_premium)
            .await?
            .ok_or_else(|| CoreError::not_found("profile", target))?;
        self.publish(AccessChange::Profile { user_id: target }, actor);

        tracing::info!(target = %target, actor = %actor, is_premium, "Premium flag set");
        Ok(profile)
    }

    /// Set or clear admin on `target`. Granting admin also grants premium.
    pub async fn set_admin(
        &self,
        session: Option<&Session>,
        target: DbId,
        is_admin: bool,
    ) -> Result<Profile, CoreError> {
        let actor = self.require_admin(session).await?;
        let profile = self
            .profiles
            .set_admin(actor, target, is_admin)
            .await?
            .ok_or_else(|| CoreError::not_found("profile", target))?;

        tracing::info!(target = %target, actor = %actor, is_admin, "Admin flag set");
        self.publish(AccessChange::Profile { user_id: target }, actor);
        Ok(profile)
    }

    // ---------------------------------------------------------------------
    // Grants
    // ---------------------------------------------------------------------

    /// Replace every grant of `target` with `project_ids`, stamped with the
    /// caller. Duplicates collapse; an empty list revokes everything.
    pub async fn replace_user_grants(
        &self,
        session: Option<&Session>,
        target: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<UserProjectAccess>, CoreError> {
        let actor = self.require_admin(session).await?;
        self.profiles
            .find_profile(target)
            .await?
            .ok_or_else(|| CoreError::not_found("profile", target))?;

        let mut seen = HashSet::new();
        let unique: Vec<DbId> = project_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let rows = self
            .grants
            .replace_user_grants(actor, target, &unique)
            .await?;
        if rows.len() < unique.len() {
            tracing::warn!(
                target = %target,
                requested = unique.len(),
                granted = rows.len(),
                "Skipped grants for unknown projects"
            );
        }

        tracing::info!(target = %target, actor = %actor, count = rows.len(), "Replaced user grants");
        self.publish(AccessChange::UserGrants { user_id: target }, actor);
        Ok(rows)
    }

    /// Revoke one grant of `target`, or all of them.
    pub async fn revoke_project_access(
        &self,
        session: Option<&Session>,
        target: DbId,
        project_id: Option<DbId>,
    ) -> Result<u64, CoreError> {
        let actor = self.require_admin(session).await?;
        let removed = self
            .grants
            .revoke_user_grants(actor, target, project_id)
            .await?;

        tracing::info!(target = %target, project_id = ?project_id, removed, "Revoked user grants");
        self.publish(AccessChange::UserGrants { user_id: target }, actor);
        Ok(removed)
    }

    /// Flag a project public (visible to visitors and regular users) or not.
    pub async fn set_public_access(
        &self,
        session: Option<&Session>,
        project_id: DbId,
        is_public: bool,
    ) -> Result<PublicProjectAccess, CoreError> {
        let actor = self.require_admin(session).await?;
        let row = self
            .grants
            .upsert_public_access(actor, project_id, is_public)
            .await?
            .ok_or_else(|| CoreError::not_found("property", project_id))?;

        tracing::info!(project_id = %project_id, actor = %actor, is_public, "Public access set");
        self.publish(AccessChange::PublicGrants { project_id }, actor);
        Ok(row)
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    pub async fn create_property(
        &self,
        session: Option<&Session>,
        mut input: CreateProperty,
    ) -> Result<Property, CoreError> {
        let actor = self.require_admin(session).await?;
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        normalize_main(&mut input.images);

        let property = self.properties.create_property(actor, &input).await?;
        tracing::info!(property_id = %property.id, actor = %actor, "Property created");
        self.publish(AccessChange::Property { project_id: property.id }, actor);
        Ok(property)
    }

    pub async fn update_property(
        &self,
        session: Option<&Session>,
        id: DbId,
        mut input: UpdateProperty,
    ) -> Result<Property, CoreError> {
        let actor = self.require_admin(session).await?;
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if let Some(images) = input.images.as_mut() {
            normalize_main(images);
        }

        let property = self
            .properties
            .update_property(actor, id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("property", id))?;
        tracing::info!(property_id = %id, actor = %actor, "Property updated");
        self.publish(AccessChange::Property { project_id: id }, actor);
        Ok(property)
    }

    /// Delete a property along with its grants and inquiries.
    pub async fn delete_property(
        &self,
        session: Option<&Session>,
        id: DbId,
    ) -> Result<(), CoreError> {
        let actor = self.require_admin(session).await?;
        if !self.properties.delete_property(actor, id).await? {
            return Err(CoreError::not_found("property", id));
        }
        tracing::info!(property_id = %id, actor = %actor, "Property deleted");
        self.publish(AccessChange::Property { project_id: id }, actor);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Admin reads
    // ---------------------------------------------------------------------

    pub async fn list_users(
        &self,
        session: Option<&Session>,
        filter: &RosterFilter,
    ) -> Result<Vec<Profile>, CoreError> {
        let actor = self.require_admin(session).await?;
        let mut users = self.profiles.list_profiles(actor).await?;
        users.retain(|p| filter.matches(p));
        Ok(users)
    }

    pub async fn user_grant_details(
        &self,
        session: Option<&Session>,
        target: DbId,
    ) -> Result<Vec<UserGrantDetail>, CoreError> {
        self.require_admin(session).await?;
        Ok(self.grants.user_grant_details(target).await?)
    }

    pub async fn projects_with_public_flag(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<ProjectVisibility>, CoreError> {
        self.require_admin(session).await?;
        Ok(self.grants.projects_with_public_flag().await?)
    }

    /// Admin property table, newest first.
    pub async fn search_properties(
        &self,
        session: Option<&Session>,
        search: &AdminSearch,
    ) -> Result<Vec<Property>, CoreError> {
        self.require_admin(session).await?;
        let mut properties = self.properties.list_properties().await?;
        properties.retain(|p| search.matches(p));
        Ok(properties)
    }

    pub async fn portfolio_summary(
        &self,
        session: Option<&Session>,
    ) -> Result<PortfolioSummary, CoreError> {
        self.require_admin(session).await?;
        let properties = self.properties.list_properties().await?;
        Ok(PortfolioSummary::compute(&properties))
    }

    pub async fn list_inquiries(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<InquiryWithProject>, CoreError> {
        self.require_admin(session).await?;
        Ok(self.inquiries.list_inquiries().await?)
    }

    pub async fn project_inquiries(
        &self,
        session: Option<&Session>,
        project_id: DbId,
    ) -> Result<Vec<Inquiry>, CoreError> {
        self.require_admin(session).await?;
        Ok(self.inquiries.project_inquiries(project_id).await?)
    }
}
