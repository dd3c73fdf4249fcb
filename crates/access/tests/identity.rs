mod common;

use std::sync::Arc;

use rigel_access::config::AccessConfig;
use rigel_access::identity::IdentityClassifier;
use rigel_access::memory::MemoryStore;
use rigel_access::session::Session;
use rigel_access::store::ProfileStore;
use rigel_core::roles::Tier;
use rigel_core::types::DbId;

use common::{seed_user, FailingProfiles};

fn classifier(store: Arc<MemoryStore>) -> IdentityClassifier {
    IdentityClassifier::new(store, AccessConfig::default())
}

#[tokio::test]
async fn test_no_session_is_visitor() {
    let identity = classifier(Arc::new(MemoryStore::new())).classify(None).await;
    assert_eq!(identity.tier, Tier::Visitor);
    assert_eq!(identity.user_id, None);
    assert!(!identity.is_admin_loading);
}

#[tokio::test]
async fn test_stored_flags_decide_tier() {
    let store = Arc::new(MemoryStore::new());
    let admin = seed_user(&store, "admin@example.com", true, false).await;
    let premium = seed_user(&store, "premium@example.com", false, true).await;
    let regular = seed_user(&store, "regular@example.com", false, false).await;
    let classifier = classifier(store);

    assert_eq!(classifier.classify(Some(&admin)).await.tier, Tier::Admin);
    assert_eq!(classifier.classify(Some(&premium)).await.tier, Tier::Premium);
    assert_eq!(classifier.classify(Some(&regular)).await.tier, Tier::Regular);
}

#[tokio::test]
async fn test_missing_profile_is_regular() {
    let session = Session::new(DbId::new_v4(), "new@example.com");
    let identity = classifier(Arc::new(MemoryStore::new()))
        .classify(Some(&session))
        .await;
    assert_eq!(identity.tier, Tier::Regular);
    assert_eq!(identity.user_id, Some(session.user_id));
}

#[tokio::test]
async fn test_lookup_failure_degrades_to_regular() {
    let classifier = IdentityClassifier::new(Arc::new(FailingProfiles), AccessConfig::default());
    let session = Session::new(DbId::new_v4(), "someone@example.com");
    assert_eq!(classifier.classify(Some(&session)).await.tier, Tier::Regular);
}

#[tokio::test]
async fn test_break_glass_ids_force_tier_even_when_lookup_fails() {
    let operator = DbId::new_v4();
    let backer = DbId::new_v4();
    let classifier = IdentityClassifier::new(
        Arc::new(FailingProfiles),
        AccessConfig {
            bootstrap_admin: Some(operator),
            bootstrap_premium: Some(backer),
        },
    );

    let admin = classifier
        .classify(Some(&Session::new(operator, "ops@example.com")))
        .await;
    let premium = classifier
        .classify(Some(&Session::new(backer, "backer@example.com")))
        .await;
    assert_eq!(admin.tier, Tier::Admin);
    assert_eq!(premium.tier, Tier::Premium);
}

#[tokio::test]
async fn test_break_glass_matches_id_not_email() {
    let operator = DbId::new_v4();
    let classifier = IdentityClassifier::new(
        Arc::new(MemoryStore::new()),
        AccessConfig {
            bootstrap_admin: Some(operator),
            bootstrap_premium: None,
        },
    );

    // Same email as the operator, different user id.
    let impostor = Session::new(DbId::new_v4(), "ops@example.com");
    assert_eq!(classifier.classify(Some(&impostor)).await.tier, Tier::Regular);
}

#[tokio::test]
async fn test_sign_in_creates_profile_once() {
    let store = Arc::new(MemoryStore::new());
    let classifier = classifier(Arc::clone(&store));
    let session = Session::new(DbId::new_v4(), "first@example.com");

    let identity = classifier.sign_in(&session).await;
    assert_eq!(identity.tier, Tier::Regular);

    let stored = store.find_profile(session.user_id).await.unwrap().unwrap();
    assert_eq!(stored.email, "first@example.com");
    assert!(!stored.is_admin && !stored.is_premium);

    let renamed = Session::new(session.user_id, "renamed@example.com");
    classifier.sign_in(&renamed).await;
    let stored = store.find_profile(session.user_id).await.unwrap().unwrap();
    assert_eq!(stored.email, "renamed@example.com");
    assert!(!stored.is_admin && !stored.is_premium);
}

#[tokio::test]
async fn test_sign_in_keeps_role_flags() {
    let store = Arc::new(MemoryStore::new());
    let admin = seed_user(&store, "admin@example.com", true, true).await;
    let identity = classifier(store).sign_in(&admin).await;
    assert_eq!(identity.tier, Tier::Admin);
}
