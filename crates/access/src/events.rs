//! Access-change notifications.
//!
//! The [`MutationGateway`](crate::gateway::MutationGateway) publishes an
//! [`AccessEvent`] after every committed write. Viewer sessions subscribe
//! and invalidate whatever relation the event touched; nothing is patched
//! optimistically, the next refresh refetches.

use rigel_core::types::{DbId, Timestamp};
use serde::Serialize;
use tokio::sync::broadcast;

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessChange {
    /// A user's role flags changed.
    Profile { user_id: DbId },
    /// A user's per-project grants were replaced or revoked.
    UserGrants { user_id: DbId },
    /// A project's public flag changed.
    PublicGrants { project_id: DbId },
    /// A property was created, edited or deleted.
    Property { project_id: DbId },
}

/// A committed access change and who made it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessEvent {
    pub change: AccessChange,
    pub actor_user_id: DbId,
    pub timestamp: Timestamp,
}

impl AccessEvent {
    pub fn new(change: AccessChange, actor_user_id: DbId) -> Self {
        Self {
            change,
            actor_user_id,
            timestamp: chrono::Utc::now(),
        }
    }
}

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`AccessEvent`]s, shared as `Arc<AccessEventBus>`.
pub struct AccessEventBus {
    sender: broadcast::Sender<AccessEvent>,
}

impl AccessEventBus {
    /// Slow receivers past `capacity` observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: AccessEvent) {
        tracing::debug!(change = ?event.change, actor = %event.actor_user_id, "Access event");
        // No receivers is fine.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccessEvent> {
        self.sender.subscribe()
    }
}

impl Default for AccessEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = AccessEventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let user_id = DbId::new_v4();
        bus.publish(AccessEvent::new(AccessChange::UserGrants { user_id }, DbId::new_v4()));

        assert_eq!(rx1.recv().await.unwrap().change, AccessChange::UserGrants { user_id });
        assert_eq!(rx2.recv().await.unwrap().change, AccessChange::UserGrants { user_id });
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = AccessEventBus::default();
        bus.publish(AccessEvent::new(
            AccessChange::PublicGrants {
                project_id: DbId::new_v4(),
            },
            DbId::new_v4(),
        ));
    }

    #[tokio::test]
    async fn test_slow_receiver_lags() {
        let bus = AccessEventBus::new(2);
        let mut rx = bus.subscribe();
        let actor = DbId::new_v4();
        for _ in 0..4 {
            bus.publish(AccessEvent::new(AccessChange::Profile { user_id: actor }, actor));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(2))
        ));
    }

    #[test]
    fn test_change_serializes_with_kind_tag() {
        let user_id = DbId::nil();
        let json = serde_json::to_value(AccessChange::Profile { user_id }).unwrap();
        assert_eq!(json["kind"], "profile");
        assert_eq!(json["user_id"], user_id.to_string());
    }
}
