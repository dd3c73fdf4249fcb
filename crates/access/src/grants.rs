//! Grant reads, tier-aware and fail-closed.

use std::sync::Arc;

use rigel_core::error::CoreError;
use rigel_core::types::DbId;
use rigel_core::visibility::{GrantSet, GrantSource, Grants};
use rigel_db::models::grant::{ProjectVisibility, UserGrantDetail};

use crate::identity::Identity;
use crate::store::GrantStore;

/// Reads the grant relations.
///
/// The two grant-set reads never fail: on a store error they log and
/// return the empty set, so a broken read hides listings rather than
/// revealing them. The admin-facing reads propagate errors.
#[derive(Clone)]
pub struct GrantAdapter {
    store: Arc<dyn GrantStore>,
}

impl GrantAdapter {
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self { store }
    }

    /// Projects `user_id` holds an explicit grant for.
    pub async fn user_grants(&self, user_id: DbId) -> GrantSet {
        match self.store.user_project_ids(user_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User grant read failed");
                GrantSet::new()
            }
        }
    }

    /// Projects flagged public.
    pub async fn public_grants(&self) -> GrantSet {
        match self.store.public_project_ids().await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Public grant read failed");
                GrantSet::new()
            }
        }
    }

    /// Read only the relation `identity`'s tier needs.
    ///
    /// Admins read nothing and get an empty set, which the resolver ignores.
    pub async fn grants_for(&self, identity: &Identity) -> Grants {
        let Some(tier) = identity.resolved_tier() else {
            return Grants::Pending;
        };
        let set = match GrantSource::for_tier(tier) {
            GrantSource::Public => self.public_grants().await,
            GrantSource::User => match identity.user_id {
                Some(user_id) => self.user_grants(user_id).await,
                None => GrantSet::new(),
            },
            GrantSource::Unrestricted => GrantSet::new(),
        };
        Grants::Loaded(set)
    }

    /// Every property with its public flag, for the visibility screen.
    pub async fn projects_with_public_flag(&self) -> Result<Vec<ProjectVisibility>, CoreError> {
        Ok(self.store.projects_with_public_flag().await?)
    }

    /// A user's grants with project title and area.
    pub async fn user_grant_details(
        &self,
        user_id: DbId,
    ) -> Result<Vec<UserGrantDetail>, CoreError> {
        Ok(self.store.user_grant_details(user_id).await?)
    }
}
