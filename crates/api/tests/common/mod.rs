#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rigel_access::config::AccessConfig;
use rigel_access::memory::MemoryStore;
use rigel_access::session::Session;
use rigel_access::AccessService;
use rigel_core::listing::PropertyStatus;
use rigel_core::types::DbId;
use rigel_db::models::profile::Profile;
use rigel_db::models::property::{CreateProperty, Property};
use serde_json::Value;
use tower::ServiceExt;

use rigel_api::auth::jwt::{issue_session_token, JwtConfig};
use rigel_api::config::ServerConfig;
use rigel_api::router::build_app_router;
use rigel_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            token_expiry_mins: 60,
        },
        access: AccessConfig::default(),
    }
}

/// An in-memory backed app plus handles for seeding it.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub access: AccessService,
    pub config: ServerConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_access_config(AccessConfig::default())
    }

    pub fn with_access_config(access_config: AccessConfig) -> Self {
        let mut config = test_config();
        config.access = access_config.clone();
        let store = Arc::new(MemoryStore::new());
        let access = AccessService::new(Arc::clone(&store), access_config);
        Self {
            store,
            access,
            config,
        }
    }

    /// The full router with the production middleware stack.
    pub fn router(&self) -> Router {
        let state = AppState {
            pool: None,
            config: Arc::new(self.config.clone()),
            access: self.access.clone(),
        };
        build_app_router(state, &self.config)
    }

    /// Seed a profile and return a bearer token for it.
    pub async fn user(&self, email: &str, is_admin: bool, is_premium: bool) -> (Session, String) {
        let id = DbId::new_v4();
        self.store
            .seed_profile(Profile {
                id,
                email: email.to_string(),
                is_admin,
                is_premium,
                created_at: chrono::Utc::now(),
            })
            .await;
        let token = self.token_for(id, email);
        (Session::new(id, email), token)
    }

    /// A valid token for a user with no profile row yet.
    pub fn token_for(&self, id: DbId, email: &str) -> String {
        issue_session_token(id, email, &self.config.jwt).unwrap()
    }

    pub async fn property(&self, title: &str) -> Property {
        self.store.seed_property(&property_input(title)).await
    }
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
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
