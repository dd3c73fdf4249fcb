//! The access resolver: who may see which listing, and who may change that.
//!
//! The pieces, in the order a request flows through them:
//!
//! - [`identity::IdentityClassifier`] turns a session into a role tier.
//! - [`grants::GrantAdapter`] reads the one grant relation that tier needs.
//! - [`resolver::AccessResolver`] combines tier, grants and listings per
//!   request; [`viewer::ViewerSession`] does the same for a long-lived
//!   viewer whose session and grants change underneath it.
//! - [`gateway::MutationGateway`] re-checks the caller before every
//!   privileged write and announces the change on the [`events`] bus.
//!
//! Storage sits behind the async traits in [`store`], with a PostgreSQL
//! backend ([`pg::PgStore`]) and an in-memory one ([`memory::MemoryStore`]).

pub mod config;
pub mod events;
pub mod gateway;
pub mod grants;
pub mod identity;
pub mod inquiries;
pub mod memory;
pub mod pg;
pub mod resolver;
pub mod session;
pub mod store;
pub mod viewer;

use std::sync::Arc;

use config::AccessConfig;
use events::AccessEventBus;
use gateway::MutationGateway;
use grants::GrantAdapter;
use identity::IdentityClassifier;
use inquiries::InquiryIntake;
use resolver::AccessResolver;
use store::Store;
use viewer::ViewerSession;

/// Every access component wired to one store and one event bus.
///
/// Cheap to clone; intended to live in the HTTP application state.
#[derive(Clone)]
pub struct AccessService {
    pub resolver: Arc<AccessResolver>,
    pub gateway: Arc<MutationGateway>,
    pub inquiries: Arc<InquiryIntake>,
    pub events: Arc<AccessEventBus>,
    classifier: IdentityClassifier,
    grants: GrantAdapter,
    properties: Arc<dyn store::PropertyStore>,
}

impl AccessService {
    pub fn new<S: Store + 'static>(store: Arc<S>, config: AccessConfig) -> Self {
        let events = Arc::new(AccessEventBus::default());
        let classifier = IdentityClassifier::new(store.clone(), config);
        let grants = GrantAdapter::new(store.clone());

        Self {
            resolver: Arc::new(AccessResolver::new(
                classifier.clone(),
                grants.clone(),
                store.clone(),
            )),
            gateway: Arc::new(MutationGateway::new(store.clone(), Arc::clone(&events))),
            inquiries: Arc::new(InquiryIntake::new(store.clone())),
            events,
            classifier,
            grants,
            properties: store,
        }
    }

    /// A fresh viewer session sharing this service's store and config.
    pub fn viewer_session(&self) -> ViewerSession {
        ViewerSession::new(
            self.classifier.clone(),
            self.grants.clone(),
            Arc::clone(&self.properties),
        )
    }
}
