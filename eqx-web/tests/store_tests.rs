//! Profile store tests
//!
//! Exercises the upsert contract against an in-memory database: idempotence
//! by user id, in-place updates, and the verified flag lifecycle.

use eqx_common::db::create_schema;
use eqx_common::models::{Identity, ProfileInput, VerificationFields};
use eqx_web::store::{ProfileStore, SqliteProfileStore};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn test_store() -> SqliteProfileStore {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    create_schema(&pool).await.unwrap();
    SqliteProfileStore::new(pool)
}

fn jane() -> Identity {
    Identity {
        user_id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@x.com".to_string(),
    }
}

fn fields_for(identity: &Identity) -> VerificationFields {
    let input = ProfileInput {
        address: "123 Main".to_string(),
        city: "Metropolis".to_string(),
        state: "CA".to_string(),
        postal_code: "90001".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        ssn: "123-45-6789".to_string(),
        password: "secret".to_string(),
    };
    VerificationFields::from_parts(identity, &input, "hashed".to_string())
}

#[tokio::test]
async fn missing_profile_resolves_to_none() {
    let store = test_store().await;
    let found = store.find_profile(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn first_upsert_creates_a_verified_record() {
    let store = test_store().await;
    let identity = jane();

    let record_id = store
        .upsert_profile(identity.user_id, &fields_for(&identity))
        .await
        .unwrap();

    let profile = store.find_profile(identity.user_id).await.unwrap().unwrap();
    assert_eq!(profile.record_id, record_id);
    assert_eq!(profile.user_id, identity.user_id);
    assert_eq!(profile.first_name, "Jane");
    assert_eq!(profile.address, "123 Main");
    assert!(profile.is_verified);
}

#[tokio::test]
async fn repeated_upsert_is_idempotent() {
    let store = test_store().await;
    let identity = jane();
    let fields = fields_for(&identity);

    let first = store.upsert_profile(identity.user_id, &fields).await.unwrap();
    let second = store.upsert_profile(identity.user_id, &fields).await.unwrap();

    // Same record id, exactly one row
    assert_eq!(first, second);
    let profile = store.find_profile(identity.user_id).await.unwrap().unwrap();
    assert_eq!(profile.record_id, first);
}

#[tokio::test]
async fn resubmission_updates_in_place_and_stays_verified() {
    let store = test_store().await;
    let identity = jane();

    let first = store
        .upsert_profile(identity.user_id, &fields_for(&identity))
        .await
        .unwrap();

    let mut changed = fields_for(&identity);
    changed.address = "456 Elm".to_string();
    changed.city = "Gotham".to_string();
    let second = store.upsert_profile(identity.user_id, &changed).await.unwrap();

    assert_eq!(first, second);
    let profile = store.find_profile(identity.user_id).await.unwrap().unwrap();
    assert_eq!(profile.address, "456 Elm");
    assert_eq!(profile.city, "Gotham");
    assert!(profile.is_verified);
}

#[tokio::test]
async fn profiles_are_keyed_per_user() {
    let store = test_store().await;
    let alice = jane();
    let bob = Identity {
        user_id: Uuid::new_v4(),
        first_name: "Bob".to_string(),
        last_name: "Roe".to_string(),
        email: "bob@x.com".to_string(),
    };

    let alice_record = store
        .upsert_profile(alice.user_id, &fields_for(&alice))
        .await
        .unwrap();
    let bob_record = store
        .upsert_profile(bob.user_id, &fields_for(&bob))
        .await
        .unwrap();

    assert_ne!(alice_record, bob_record);
    assert_eq!(
        store.find_profile(alice.user_id).await.unwrap().unwrap().first_name,
        "Jane"
    );
    assert_eq!(
        store.find_profile(bob.user_id).await.unwrap().unwrap().first_name,
        "Bob"
    );
}
