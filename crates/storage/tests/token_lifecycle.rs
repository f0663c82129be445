#![forbid(unsafe_code)]

use bk_core::ids::TenantId;
use bk_core::model::APPLIED_BUCKET_ID;
use bk_storage::{
    Advance, ApplyRequest, PipelineStore, SaveBucketRequest, StoreConfig, StoreError,
};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("bk_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn open_store(test_name: &str) -> PipelineStore {
    PipelineStore::open(temp_dir(test_name), StoreConfig::default()).expect("open store")
}

fn tenant(value: &str) -> TenantId {
    TenantId::try_new(value).expect("tenant id")
}

fn create_bucket(store: &mut PipelineStore, tenant: &TenantId, title: &str) -> u64 {
    store
        .bucket_save(
            tenant,
            SaveBucketRequest {
                id: None,
                title: title.to_string(),
            },
        )
        .expect("create bucket")
        .id
}

fn apply(store: &mut PipelineStore, tenant: &TenantId, job: u64, email: &str) -> u64 {
    store
        .token_apply(
            tenant,
            ApplyRequest {
                bucket: None,
                job,
                email: email.to_string(),
            },
        )
        .expect("apply token")
        .id
}

#[test]
fn apply_defaults_to_applied_stage() {
    let mut store = open_store("apply_defaults_to_applied_stage");
    let t = tenant("acme");

    let token = store
        .token_apply(
            &t,
            ApplyRequest {
                bucket: None,
                job: 5,
                email: "a@x.com".to_string(),
            },
        )
        .expect("apply token");
    assert_eq!(token.id, 1);
    assert_eq!(token.bucket, APPLIED_BUCKET_ID);
    assert_eq!(token.job, 5);
}

#[test]
fn apply_with_explicit_bucket() {
    let mut store = open_store("apply_with_explicit_bucket");
    let t = tenant("acme");
    let onsite = create_bucket(&mut store, &t, "Onsite");

    let token = store
        .token_apply(
            &t,
            ApplyRequest {
                bucket: Some(onsite),
                job: 7,
                email: "b@x.com".to_string(),
            },
        )
        .expect("apply token");
    assert_eq!(token.bucket, onsite);
}

#[test]
fn apply_with_unknown_bucket_is_rejected() {
    let mut store = open_store("apply_with_unknown_bucket_is_rejected");
    let t = tenant("acme");

    let err = store
        .token_apply(
            &t,
            ApplyRequest {
                bucket: Some(42),
                job: 7,
                email: "b@x.com".to_string(),
            },
        )
        .expect_err("expected unknown bucket");
    assert!(matches!(err, StoreError::UnknownId), "got {err:?}");
    assert_eq!(store.token_list(&t).expect("list tokens"), Vec::new());
}

#[test]
fn apply_with_empty_email_is_rejected() {
    let mut store = open_store("apply_with_empty_email_is_rejected");
    let t = tenant("acme");

    let err = store
        .token_apply(
            &t,
            ApplyRequest {
                bucket: None,
                job: 7,
                email: " ".to_string(),
            },
        )
        .expect_err("expected missing email");
    assert!(matches!(err, StoreError::MissingEmail), "got {err:?}");
}

#[test]
fn advance_walks_the_pipeline_and_graduates() {
    let mut store = open_store("advance_walks_the_pipeline_and_graduates");
    let t = tenant("acme");
    let phone = create_bucket(&mut store, &t, "Phone Screen");
    let onsite = create_bucket(&mut store, &t, "Onsite");
    let token = apply(&mut store, &t, 5, "a@x.com");

    match store.token_advance(&t, token).expect("advance") {
        Advance::Moved(moved) => assert_eq!(moved.bucket, phone),
        other => panic!("expected move into first bucket, got {other:?}"),
    }
    match store.token_advance(&t, token).expect("advance") {
        Advance::Moved(moved) => assert_eq!(moved.bucket, onsite),
        other => panic!("expected move into last bucket, got {other:?}"),
    }
    assert_eq!(
        store.token_advance(&t, token).expect("advance"),
        Advance::Graduated
    );
    assert_eq!(store.token_list(&t).expect("list tokens"), Vec::new());

    // Deleting the first stage compacts the survivor to position 1.
    assert!(store.bucket_delete(&t, phone).expect("delete bucket"));
    let buckets = store.bucket_list(&t).expect("list buckets");
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[1].id, onsite);
    assert_eq!(buckets[1].position, 1);
}

#[test]
fn advance_with_no_buckets_graduates() {
    let mut store = open_store("advance_with_no_buckets_graduates");
    let t = tenant("acme");
    let token = apply(&mut store, &t, 1, "a@x.com");

    assert_eq!(
        store.token_advance(&t, token).expect("advance"),
        Advance::Graduated
    );
    assert_eq!(store.token_list(&t).expect("list tokens"), Vec::new());
}

#[test]
fn advance_of_unknown_token_errors() {
    let mut store = open_store("advance_of_unknown_token_errors");
    let t = tenant("acme");

    let err = store.token_advance(&t, 42).expect_err("unknown token");
    assert!(matches!(err, StoreError::UnknownId), "got {err:?}");
}

#[test]
fn remove_is_idempotent() {
    let mut store = open_store("remove_is_idempotent");
    let t = tenant("acme");
    let token = apply(&mut store, &t, 1, "a@x.com");

    assert!(store.token_remove(&t, token).expect("remove token"));
    assert!(!store.token_remove(&t, token).expect("remove again"));
    assert!(!store.token_remove(&t, 42).expect("remove absent"));
}

#[test]
fn token_ids_are_never_reused() {
    let mut store = open_store("token_ids_are_never_reused");
    let t = tenant("acme");

    assert_eq!(apply(&mut store, &t, 1, "a@x.com"), 1);
    assert_eq!(apply(&mut store, &t, 2, "b@x.com"), 2);
    assert!(store.token_remove(&t, 2).expect("remove token"));
    assert_eq!(apply(&mut store, &t, 3, "c@x.com"), 3);
}

#[test]
fn bucket_ids_are_never_reused() {
    let mut store = open_store("bucket_ids_are_never_reused");
    let t = tenant("acme");

    assert_eq!(create_bucket(&mut store, &t, "A"), 1);
    assert_eq!(create_bucket(&mut store, &t, "B"), 2);
    assert!(store.bucket_delete(&t, 2).expect("delete bucket"));
    // Positions recycle, ids do not.
    let bucket = store
        .bucket_save(
            &t,
            SaveBucketRequest {
                id: None,
                title: "C".to_string(),
            },
        )
        .expect("create bucket");
    assert_eq!(bucket.id, 3);
    assert_eq!(bucket.position, 2);
}
