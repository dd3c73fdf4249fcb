//! Identity classification: session in, role tier out.

use std::sync::Arc;

use rigel_core::roles::{classify_tier, Tier};
use rigel_core::types::DbId;
use serde::Serialize;

use crate::config::AccessConfig;
use crate::session::Session;
use crate::store::ProfileStore;

/// The classified viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub tier: Tier,
    pub user_id: Option<DbId>,
    /// The profile lookup is still outstanding. `tier` is provisional
    /// (`regular`) and must not be used for access decisions.
    pub is_admin_loading: bool,
}

impl Identity {
    pub fn visitor() -> Self {
        Self {
            tier: Tier::Visitor,
            user_id: None,
            is_admin_loading: false,
        }
    }

    /// Placeholder for a signed-in user whose profile is being fetched.
    pub fn loading(user_id: DbId) -> Self {
        Self {
            tier: Tier::Regular,
            user_id: Some(user_id),
            is_admin_loading: true,
        }
    }

    /// The tier, or `None` while it is provisional.
    pub fn resolved_tier(&self) -> Option<Tier> {
        (!self.is_admin_loading).then_some(self.tier)
    }
}

/// Classifies sessions against stored profile flags and break-glass ids.
///
/// Never fails: a lookup error or missing profile degrades to `regular`
/// (unless a break-glass id matches) and is logged.
#[derive(Clone)]
pub struct IdentityClassifier {
    profiles: Arc<dyn ProfileStore>,
    config: AccessConfig,
}

impl IdentityClassifier {
    pub fn new(profiles: Arc<dyn ProfileStore>, config: AccessConfig) -> Self {
        Self { profiles, config }
    }

    pub async fn classify(&self, session: Option<&Session>) -> Identity {
        let Some(session) = session else {
            return Identity::visitor();
        };

        let flags = match self.profiles.find_profile(session.user_id).await {
            Ok(Some(profile)) => Some(profile.role_flags()),
            Ok(None) => {
                tracing::debug!(user_id = %session.user_id, "No profile for session");
                None
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %session.user_id,
                    error = %e,
                    "Profile lookup failed, classifying as regular"
                );
                None
            }
        };

        let tier = classify_tier(flags, self.config.override_for(session.user_id));
        tracing::debug!(user_id = %session.user_id, tier = %tier, "Classified session");

        Identity {
            tier,
            user_id: Some(session.user_id),
            is_admin_loading: false,
        }
    }

    /// Make sure the session has a profile row, then classify it.
    ///
    /// Called on sign-in. A failed upsert is logged and classification
    /// proceeds as usual.
    pub async fn sign_in(&self, session: &Session) -> Identity {
        if let Err(e) = self
            .profiles
            .ensure_profile(session.user_id, &session.email)
            .await
        {
            tracing::warn!(user_id = %session.user_id, error = %e, "Failed to ensure profile");
        }
        self.classify(Some(session)).await
    }
}
