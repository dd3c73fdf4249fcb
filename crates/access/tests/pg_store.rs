//! Gateway and store behaviour against the Postgres backend.

use std::sync::Arc;

use assert_matches::assert_matches;
use rigel_access::config::AccessConfig;
use rigel_access::gateway::RosterFilter;
use rigel_access::pg::PgStore;
use rigel_access::session::Session;
use rigel_access::store::{GrantStore, ProfileStore, StoreError};
use rigel_access::AccessService;
use rigel_core::error::CoreError;
use rigel_core::listing::PropertyStatus;
use rigel_core::types::DbId;
use rigel_db::models::property::CreateProperty;
use sqlx::PgPool;

async fn insert_user(pool: &PgPool, email: &str, is_admin: bool, is_premium: bool) -> Session {
    let id = DbId::new_v4();
    sqlx::query("INSERT INTO profiles (id, email, is_admin, is_premium) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(email)
        .bind(is_admin)
        .bind(is_premium)
        .execute(pool)
        .await
        .unwrap();
    Session::new(id, email)
}

fn property_input(title: &str) -> CreateProperty {
    CreateProperty {
        title: title.to_string(),
        area: "Kifisia".to_string(),
        price: 510_000.0,
        size: 140.0,
        bedrooms: 3,
        bathrooms: 2,
        status: PropertyStatus::Available,
        golden_visa: false,
        purchase_price: 300_000.0,
        transfer_fees: 9_000.0,
        renovation_cost: 21_000.0,
        selling_price: 390_000.0,
        images: Vec::new(),
        description: String::new(),
        completion_year: None,
    }
}

fn service(pool: &PgPool) -> (Arc<PgStore>, AccessService) {
    let store = Arc::new(PgStore::new(pool.clone()));
    let access = AccessService::new(Arc::clone(&store), AccessConfig::default());
    (store, access)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn premium_upgrade_grants_every_project(pool: PgPool) {
    let (store, access) = service(&pool);
    let admin = insert_user(&pool, "admin@example.com", true, true).await;
    let user = insert_user(&pool, "buyer@example.com", false, false).await;
    let a = access
        .gateway
        .create_property(Some(&admin), property_input("Garden flat"))
        .await
        .unwrap();
    let b = access
        .gateway
        .create_property(Some(&admin), property_input("Roof suite"))
        .await
        .unwrap();

    let profile = access
        .gateway
        .set_premium(Some(&admin), user.user_id, true)
        .await
        .unwrap();
    assert!(profile.is_premium);

    let mut grants = store.user_project_ids(user.user_id).await.unwrap();
    grants.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(grants, expected);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn roster_requires_admin_at_every_layer(pool: PgPool) {
    let (store, access) = service(&pool);
    let admin = insert_user(&pool, "admin@example.com", true, true).await;
    let regular = insert_user(&pool, "regular@example.com", false, false).await;

    assert_matches!(
        access
            .gateway
            .list_users(Some(&regular), &RosterFilter::default())
            .await,
        Err(CoreError::PermissionDenied(_))
    );
    assert_matches!(
        store.list_profiles(regular.user_id).await,
        Err(StoreError::Denied)
    );

    let users = access
        .gateway
        .list_users(Some(&admin), &RosterFilter::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_write_is_denied_by_the_store(pool: PgPool) {
    let (store, _access) = service(&pool);
    let regular = insert_user(&pool, "regular@example.com", false, true).await;

    assert_matches!(
        store.grant_all_projects(regular.user_id, regular.user_id).await,
        Err(StoreError::Denied)
    );
    assert!(store.user_project_ids(regular.user_id).await.unwrap().is_empty());
}
