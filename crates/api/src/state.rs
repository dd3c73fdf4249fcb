use std::sync::Arc;

use rigel_access::AccessService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Connection pool, when the access layer is backed by PostgreSQL.
    /// Only the health check reads it directly.
    pub pool: Option<rigel_db::DbPool>,
    pub config: Arc<ServerConfig>,
    /// Resolver, gateway, inquiry intake and access event bus.
    pub access: AccessService,
}
