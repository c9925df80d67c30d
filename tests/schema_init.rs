//! Integration tests against a live MongoDB deployment.
//!
//! All tests are `#[ignore]` so they only run where a deployment is
//! available, e.g.:
//!
//! ```sh
//! docker run -d -p 27017:27017 \
//!   -e MONGO_INITDB_ROOT_USERNAME=root \
//!   -e MONGO_INITDB_ROOT_PASSWORD=example mongo:7
//! cargo test -- --ignored
//! ```
//!
//! The target endpoint is read from the same `MONGO_*` variables the tool
//! itself honors. Each test works in its own throwaway database so they
//! can run in parallel and never touch `ugc2_movies`.

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use ugc_schema::{SchemaDefinitions, SchemaStatus, UgcConfig, UgcStore};

fn test_config(db: &str) -> UgcConfig {
    let defaults = UgcConfig::default();
    UgcConfig {
        host: std::env::var("MONGO_HOST").unwrap_or(defaults.host),
        port: std::env::var("MONGO_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        login: std::env::var("MONGO_LOGIN").unwrap_or(defaults.login),
        password: std::env::var("MONGO_PASSWORD").unwrap_or(defaults.password),
        db: db.to_string(),
        connect_timeout_secs: 5,
    }
}

async fn fresh_store(db: &str) -> UgcStore {
    let store = UgcStore::connect(&test_config(db))
        .await
        .expect("MongoDB deployment reachable");
    store
        .database()
        .drop()
        .await
        .expect("drop throwaway database");
    store
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

#[tokio::test]
#[ignore]
async fn test_ensure_provisions_declared_schema() {
    let store = fresh_store("ugc_schema_it_ensure").await;

    let report = store.schema().ensure().await.expect("ensure");
    assert_eq!(report.created_collections.len(), 3);
    assert_eq!(report.created_indexes.len(), 3);

    let mut collections = store
        .database()
        .list_collection_names()
        .await
        .expect("list collections");
    collections.sort();
    assert_eq!(
        collections,
        vec!["bookmarks_movies", "liked_movies", "reviewed_movies"]
    );

    for spec in SchemaDefinitions::COLLECTIONS {
        let indexes: Vec<_> = store
            .database()
            .collection::<Document>(spec.name)
            .list_indexes()
            .await
            .expect("list indexes")
            .try_collect()
            .await
            .expect("read indexes");

        let pair = indexes
            .iter()
            .find(|i| {
                i.options.as_ref().and_then(|o| o.name.as_deref()) == Some("film_id_1_user_id_1")
            })
            .expect("pair index present");
        assert_eq!(
            pair.options.as_ref().and_then(|o| o.unique),
            Some(true),
            "pair index on {} must be unique",
            spec.name
        );
    }

    assert_eq!(
        store.schema().status().await.expect("status"),
        SchemaStatus::Current
    );
}

#[tokio::test]
#[ignore]
async fn test_second_ensure_is_a_noop() {
    let store = fresh_store("ugc_schema_it_rerun").await;

    store.schema().ensure().await.expect("first ensure");
    let report = store.schema().ensure().await.expect("second ensure");

    assert!(report.is_noop());
    assert_eq!(report.unchanged.len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_pair_is_rejected() {
    let store = fresh_store("ugc_schema_it_dup").await;
    store.schema().ensure().await.expect("ensure");

    let likes = store
        .database()
        .collection::<Document>(SchemaDefinitions::LIKED_MOVIES);

    likes
        .insert_one(doc! { "film_id": "tt0133093", "user_id": "u1", "rating": 10 })
        .await
        .expect("first like");

    let err = likes
        .insert_one(doc! { "film_id": "tt0133093", "user_id": "u1", "rating": 4 })
        .await
        .expect_err("second like with the same pair must be rejected");
    assert!(is_duplicate_key(&err), "expected code 11000, got {}", err);
}

#[tokio::test]
#[ignore]
async fn test_same_film_different_user_is_accepted() {
    let store = fresh_store("ugc_schema_it_pair").await;
    store.schema().ensure().await.expect("ensure");

    let bookmarks = store
        .database()
        .collection::<Document>(SchemaDefinitions::BOOKMARKS_MOVIES);

    bookmarks
        .insert_one(doc! { "film_id": "tt0133093", "user_id": "u1" })
        .await
        .expect("first user");
    bookmarks
        .insert_one(doc! { "film_id": "tt0133093", "user_id": "u2" })
        .await
        .expect("same film, different user");
    bookmarks
        .insert_one(doc! { "film_id": "tt0234215", "user_id": "u1" })
        .await
        .expect("same user, different film");
}

#[tokio::test]
#[ignore]
async fn test_ensure_fills_in_missing_pieces() {
    let store = fresh_store("ugc_schema_it_partial").await;

    // Half-provisioned database: one collection without its index
    store
        .database()
        .create_collection(SchemaDefinitions::LIKED_MOVIES)
        .await
        .expect("create collection");

    let report = store.schema().ensure().await.expect("ensure");
    assert_eq!(report.created_collections.len(), 2);
    assert_eq!(report.created_indexes.len(), 3);
    assert_eq!(
        store.schema().status().await.expect("status"),
        SchemaStatus::Current
    );
}

#[tokio::test]
#[ignore]
async fn test_ensure_refuses_conflicting_index() {
    let store = fresh_store("ugc_schema_it_conflict").await;

    // A non-unique index over the declared keys, as a broken deployment
    // might carry
    let likes = store
        .database()
        .collection::<Document>(SchemaDefinitions::LIKED_MOVIES);
    store
        .database()
        .create_collection(SchemaDefinitions::LIKED_MOVIES)
        .await
        .expect("create collection");
    likes
        .create_index(
            mongodb::IndexModel::builder()
                .keys(doc! { "film_id": 1, "user_id": 1 })
                .build(),
        )
        .await
        .expect("create conflicting index");

    let err = store
        .schema()
        .ensure()
        .await
        .expect_err("ensure must refuse to proceed");
    assert!(err.to_string().contains("liked_movies"));

    match store.schema().status().await.expect("status") {
        SchemaStatus::Conflict { conflicts } => {
            assert!(conflicts[0].starts_with("liked_movies"));
        }
        other => panic!("expected conflict status, got {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_reset_drops_declared_collections() {
    let store = fresh_store("ugc_schema_it_reset").await;
    store.schema().ensure().await.expect("ensure");

    // Collections outside the declaration survive a reset
    store
        .database()
        .create_collection("unrelated")
        .await
        .expect("create unrelated collection");

    store.schema().reset().await.expect("reset");

    let collections = store
        .database()
        .list_collection_names()
        .await
        .expect("list collections");
    assert_eq!(collections, vec!["unrelated"]);
    assert_eq!(
        store.schema().status().await.expect("status"),
        SchemaStatus::NotInitialized
    );
}
