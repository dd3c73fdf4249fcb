//! Long-lived viewer state with generation-guarded async refreshes.
//!
//! A [`ViewerSession`] holds one viewer's session, classified identity and
//! grant set across many renders. Identity and grants load asynchronously;
//! every load captures the generation it started under and its result is
//! dropped if the generation moved on while it was in flight. Changing the
//! session's user bumps both generations, so grants fetched for the
//! previous user can never be applied to the next one.

use std::sync::Arc;

use rigel_core::error::CoreError;
use rigel_core::filter::ListingFilter;
use rigel_core::roles::Tier;
use rigel_core::visibility::{resolve_filtered, Grants, ResolvedListing};
use rigel_db::models::property::Property;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use crate::events::{AccessChange, AccessEvent};
use crate::grants::GrantAdapter;
use crate::identity::{Identity, IdentityClassifier};
use crate::session::Session;
use crate::store::PropertyStore;

/// Outcome of a refresh step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The fetched value was stored.
    Applied,
    /// The generation changed while fetching; the value was dropped.
    Stale,
    /// Nothing to do, the value is already loaded.
    Current,
    /// A prerequisite (identity, for grants) is not resolved yet.
    NotReady,
}

struct ViewerState {
    session: Option<Session>,
    /// Bumped whenever the identity must be re-resolved.
    generation: u64,
    /// `None` while the profile lookup for `session` is outstanding.
    identity: Option<Identity>,
    /// Bumped whenever the grant set must be refetched.
    grants_generation: u64,
    grants: Grants,
}

impl ViewerState {
    fn reset_identity(&mut self) {
        self.generation += 1;
        self.identity = match self.session {
            Some(_) => None,
            None => Some(Identity::visitor()),
        };
        self.reset_grants();
    }

    fn reset_grants(&mut self) {
        self.grants_generation += 1;
        self.grants = Grants::Pending;
    }

    fn user_id(&self) -> Option<rigel_core::types::DbId> {
        self.session.as_ref().map(|s| s.user_id)
    }
}

pub struct ViewerSession {
    classifier: IdentityClassifier,
    grants: GrantAdapter,
    properties: Arc<dyn PropertyStore>,
    state: RwLock<ViewerState>,
}

impl ViewerSession {
    /// Starts as an anonymous visitor with grants not yet loaded.
    pub fn new(
        classifier: IdentityClassifier,
        grants: GrantAdapter,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        Self {
            classifier,
            grants,
            properties,
            state: RwLock::new(ViewerState {
                session: None,
                generation: 0,
                identity: Some(Identity::visitor()),
                grants_generation: 0,
                grants: Grants::Pending,
            }),
        }
    }

    /// Switch to another session (sign-in, sign-out, account switch).
    ///
    /// The identity is memoised per user id: a session for the same user
    /// (e.g. a token refresh) keeps the resolved identity and grants.
    pub async fn set_session(&self, session: Option<Session>) {
        let mut state = self.state.write().await;
        let next_user = session.as_ref().map(|s| s.user_id);
        if state.user_id() == next_user {
            state.session = session;
            return;
        }

        tracing::debug!(from = ?state.user_id(), to = ?next_user, "Viewer session changed");
        state.session = session;
        state.reset_identity();
    }

    /// Current identity; `is_admin_loading` is set while it is provisional.
    pub async fn identity(&self) -> Identity {
        let state = self.state.read().await;
        match (state.identity, state.user_id()) {
            (Some(identity), _) => identity,
            (None, Some(user_id)) => Identity::loading(user_id),
            (None, None) => Identity::visitor(),
        }
    }

    pub async fn grants(&self) -> Grants {
        self.state.read().await.grants.clone()
    }

    /// Resolve the identity for the current session if it is not resolved.
    pub async fn refresh_identity(&self) -> Refresh {
        let (generation, session) = {
            let state = self.state.read().await;
            if state.identity.is_some() {
                return Refresh::Current;
            }
            (state.generation, state.session.clone())
        };

        let identity = self.classifier.classify(session.as_ref()).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(generation, current = state.generation, "Dropping stale identity");
            return Refresh::Stale;
        }
        state.identity = Some(identity);
        Refresh::Applied
    }

    /// Fetch the grant set the resolved tier needs.
    ///
    /// Waits for nothing: returns [`Refresh::NotReady`] until the identity
    /// has been resolved.
    pub async fn refresh_grants(&self) -> Refresh {
        let (generation, grants_generation, identity) = {
            let state = self.state.read().await;
            let Some(identity) = state.identity else {
                return Refresh::NotReady;
            };
            if matches!(state.grants, Grants::Loaded(_)) {
                return Refresh::Current;
            }
            (state.generation, state.grants_generation, identity)
        };

        let grants = self.grants.grants_for(&identity).await;

        let mut state = self.state.write().await;
        if state.generation != generation || state.grants_generation != grants_generation {
            tracing::debug!(
                user_id = ?identity.user_id,
                "Dropping grants fetched for a previous generation"
            );
            return Refresh::Stale;
        }
        state.grants = grants;
        Refresh::Applied
    }

    /// Resolve identity, then grants.
    pub async fn refresh(&self) {
        self.refresh_identity().await;
        self.refresh_grants().await;
    }

    /// Annotate the current listings with whatever state is loaded now.
    ///
    /// Items stay blurred with reason `loading` until both identity and
    /// grants are resolved.
    pub async fn listings(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<ResolvedListing<Property>>, CoreError> {
        let properties = self.properties.list_properties().await?;
        let (tier, grants) = {
            let state = self.state.read().await;
            (
                state.identity.and_then(|i| i.resolved_tier()),
                state.grants.clone(),
            )
        };
        Ok(resolve_filtered(tier, &grants, properties, filter))
    }

    /// Invalidate whatever `event` touched. Returns whether anything was
    /// invalidated.
    pub async fn apply(&self, event: &AccessEvent) -> bool {
        let mut state = self.state.write().await;
        let current_user = state.user_id();
        let tier = state.identity.and_then(|i| i.resolved_tier());

        let invalidate = match event.change {
            AccessChange::Profile { user_id } if Some(user_id) == current_user => {
                state.reset_identity();
                return true;
            }
            AccessChange::UserGrants { user_id } => {
                Some(user_id) == current_user && tier == Some(Tier::Premium)
            }
            AccessChange::PublicGrants { .. } => {
                matches!(tier, Some(Tier::Visitor) | Some(Tier::Regular))
            }
            AccessChange::Property { .. } => tier.is_some_and(|t| t != Tier::Admin),
            AccessChange::Profile { .. } => false,
        };

        if invalidate {
            state.reset_grants();
        }
        invalidate
    }

    /// Apply events from the bus until it closes, refreshing after each
    /// invalidation. A lagged receiver may have missed anything, so it
    /// invalidates everything.
    pub fn watch(self: Arc<Self>, mut receiver: broadcast::Receiver<AccessEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if self.apply(&event).await {
                            self.refresh().await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Viewer session lagged, reloading");
                        self.state.write().await.reset_identity();
                        self.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Access event bus closed, viewer watch ending");
                        break;
                    }
                }
            }
        })
    }
}
