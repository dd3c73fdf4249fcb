//! Access audit log.
//!
//! [`AccessAudit`] subscribes to the
//! [`AccessEventBus`](rigel_access::events::AccessEventBus) and writes one
//! structured log line per committed access change. It runs as a
//! long-lived background task and exits when the bus sender is dropped.

use rigel_access::events::{AccessChange, AccessEvent};
use rigel_core::types::DbId;
use tokio::sync::broadcast;

/// Background task that logs access changes.
pub struct AccessAudit;

impl AccessAudit {
    /// Run the audit loop until the bus closes.
    ///
    /// Returns the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<AccessEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Access audit lagged, some changes were not logged"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Access event bus closed, audit shutting down");
                    break;
                }
            }
        }
        logged
    }

    fn record(event: &AccessEvent) {
        let (kind, subject) = describe(&event.change);
        tracing::info!(
            kind,
            subject = %subject,
            actor = %event.actor_user_id,
            at = %event.timestamp,
            "Access changed"
        );
    }
}

/// Event kind label and the id of the row it touched.
pub fn describe(change: &AccessChange) -> (&'static str, DbId) {
    match *change {
        AccessChange::Profile { user_id } => ("profile", user_id),
        AccessChange::UserGrants { user_id } => ("user_grants", user_id),
        AccessChange::PublicGrants { project_id } => ("public_grants", project_id),
        AccessChange::Property { project_id } => ("property", project_id),
    }
}
