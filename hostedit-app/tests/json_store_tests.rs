#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `JsonFileHostRepository`.

use hostedit_app::adapters::JsonFileHostRepository;
use hostedit_core::error::CoreError;
use hostedit_core::traits::HostRepository;
use hostedit_core::types::{HostId, HostRecord};

fn create_test_store() -> (JsonFileHostRepository, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let store = JsonFileHostRepository::new(tmp.path().join("data").join("hosts.json"));
    (store, tmp)
}

#[tokio::test]
async fn missing_file_is_an_empty_store() {
    let (store, _tmp) = create_test_store();
    assert!(store.find_all().await.unwrap().is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn hosts_survive_reopening() {
    let (store, _tmp) = create_test_store();
    let id = store
        .save(&HostRecord::new_ssh("box", "root", "box.example").with_encoding("KOI8-R"))
        .await
        .unwrap();

    let reopened = JsonFileHostRepository::new(store.path());
    let host = reopened.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(host.nickname, "box");
    assert_eq!(host.encoding, "KOI8-R");
    assert_eq!(host.id, Some(id));
}

#[tokio::test]
async fn ids_are_never_reused() {
    let (store, _tmp) = create_test_store();
    let first = store
        .save(&HostRecord::new_ssh("a", "root", "a.example"))
        .await
        .unwrap();
    store.delete(first).await.unwrap();

    let reopened = JsonFileHostRepository::new(store.path());
    let second = reopened
        .save(&HostRecord::new_ssh("b", "root", "b.example"))
        .await
        .unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn saving_existing_host_replaces_it() {
    let (store, _tmp) = create_test_store();
    let id = store
        .save(&HostRecord::new_ssh("box", "root", "box.example"))
        .await
        .unwrap();

    let mut edited = store.find_by_id(id).await.unwrap().unwrap();
    edited.port = 2222;
    assert_eq!(store.save(&edited).await.unwrap(), id);

    let all = JsonFileHostRepository::new(store.path()).find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].port, 2222);
}

#[tokio::test]
async fn delete_removes_host_from_disk() {
    let (store, _tmp) = create_test_store();
    let keep = store
        .save(&HostRecord::new_ssh("keep", "root", "k.example"))
        .await
        .unwrap();
    let gone = store
        .save(&HostRecord::new_ssh("gone", "root", "g.example"))
        .await
        .unwrap();
    store.delete(gone).await.unwrap();

    let reopened = JsonFileHostRepository::new(store.path());
    assert!(reopened.find_by_id(gone).await.unwrap().is_none());
    assert!(reopened.find_by_id(keep).await.unwrap().is_some());
}

#[tokio::test]
async fn imported_ids_are_respected() {
    let (store, _tmp) = create_test_store();
    let mut imported = HostRecord::new_ssh("imported", "root", "i.example");
    imported.id = Some(HostId::new(40));
    assert_eq!(store.save(&imported).await.unwrap(), HostId::new(40));

    let fresh = store
        .save(&HostRecord::new_ssh("fresh", "root", "f.example"))
        .await
        .unwrap();
    assert_eq!(fresh, HostId::new(41));
}

#[tokio::test]
async fn malformed_file_is_a_serialization_error() {
    let (store, _tmp) = create_test_store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "{ not json").unwrap();

    let result = store.find_all().await;
    assert!(matches!(result, Err(CoreError::SerializationError(_))));
}

#[tokio::test]
async fn empty_file_is_an_empty_store() {
    let (store, _tmp) = create_test_store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "").unwrap();

    assert!(store.find_all().await.unwrap().is_empty());
}
