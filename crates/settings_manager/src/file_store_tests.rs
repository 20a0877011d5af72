//! Tests for the file-backed settings store.

use super::*;
use crate::scope::ScopeId;
use serde_json::json;
use tempfile::TempDir;

fn key(name: &str) -> SettingsKey {
    SettingsKey::try_new(name).unwrap()
}

fn map(value: serde_json::Value) -> SettingsMap {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_get_from_empty_root_returns_none() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path().join("does-not-exist"));

    let result = store.get(&SettingsScope::Tenant, &key("email")).await;
    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn test_put_writes_expected_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path());

    store
        .put(&SettingsScope::Tenant, &key("email"), map(json!({"driver": "smtp"})))
        .await
        .unwrap();
    store
        .put(
            &SettingsScope::School(ScopeId::from(12u64)),
            &key("email"),
            map(json!({"from_name": "A"})),
        )
        .await
        .unwrap();
    store
        .put(
            &SettingsScope::Branch(ScopeId::from(3u64)),
            &key("email.smtp"),
            map(json!({"port": 587})),
        )
        .await
        .unwrap();

    assert!(temp_dir.path().join("tenant/email.json").is_file());
    assert!(temp_dir.path().join("schools/12/email.json").is_file());
    assert!(temp_dir.path().join("branches/3/email.smtp.json").is_file());
}

#[tokio::test]
async fn test_put_then_get_survives_new_handle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let scope = SettingsScope::School(ScopeId::from(1u64));

    FileSettingsStore::new(temp_dir.path())
        .put(&scope, &key("branding"), map(json!({"colors": ["red", "blue"]})))
        .await
        .unwrap();

    let reopened = FileSettingsStore::new(temp_dir.path());
    let loaded = reopened.get(&scope, &key("branding")).await.unwrap().unwrap();
    assert_eq!(loaded.scope, scope);
    assert_eq!(loaded.value, map(json!({"colors": ["red", "blue"]})));
}

#[tokio::test]
async fn test_put_overwrites_and_leaves_no_temp_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path());

    for i in 0..3 {
        store
            .put(&SettingsScope::Tenant, &key("email"), map(json!({"n": i})))
            .await
            .unwrap();
    }

    let loaded = store
        .get(&SettingsScope::Tenant, &key("email"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.value, map(json!({"n": 2})));

    let names: Vec<String> = std::fs::read_dir(temp_dir.path().join("tenant"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["email.json".to_string()]);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path());
    let scope = SettingsScope::School(ScopeId::from(1u64));

    store.put(&scope, &key("email"), SettingsMap::new()).await.unwrap();

    assert!(store.delete(&scope, &key("email")).await.unwrap());
    assert!(!store.delete(&scope, &key("email")).await.unwrap());
    assert!(store.get(&scope, &key("email")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_document_is_storage_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path());

    std::fs::create_dir_all(temp_dir.path().join("tenant")).unwrap();
    std::fs::write(temp_dir.path().join("tenant/email.json"), "{not json").unwrap();

    let err = store
        .get(&SettingsScope::Tenant, &key("email"))
        .await
        .unwrap_err();
    match err {
        SettingsError::Storage { operation, reason } => {
            assert_eq!(operation, "get");
            assert!(reason.contains("corrupt document"));
        }
        _ => panic!("Expected Storage error"),
    }
}

#[tokio::test]
async fn test_unwritable_root_is_storage_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();

    let store = FileSettingsStore::new(&blocker);
    let err = store
        .put(&SettingsScope::Tenant, &key("email"), SettingsMap::new())
        .await
        .unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_list_keys_skips_foreign_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let store = FileSettingsStore::new(temp_dir.path());
    let scope = SettingsScope::School(ScopeId::from(4u64));

    assert!(store.list_keys(&scope).await.unwrap().is_empty());

    store.put(&scope, &key("localization"), SettingsMap::new()).await.unwrap();
    store.put(&scope, &key("email.smtp"), SettingsMap::new()).await.unwrap();
    std::fs::write(temp_dir.path().join("schools/4/notes.txt"), "ignore me").unwrap();
    std::fs::write(temp_dir.path().join("schools/4/Bad Name.json"), "{}").unwrap();

    let keys = store.list_keys(&scope).await.unwrap();
    assert_eq!(keys, vec![key("email.smtp"), key("localization")]);
}

#[tokio::test]
async fn test_separate_handles_over_one_root_write_concurrently() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let first = FileSettingsStore::new(temp_dir.path());
    let second = FileSettingsStore::new(temp_dir.path());
    let scope = SettingsScope::School(ScopeId::from(4u64));

    for round in 0..50u64 {
        let email_key = key("email");
        let (a, b) = tokio::join!(
            first.put(&scope, &email_key, map(json!({"writer": "first", "round": round}))),
            second.put(&scope, &email_key, map(json!({"writer": "second", "round": round}))),
        );
        a.expect("first handle write should succeed");
        b.expect("second handle write should succeed");

        let stored = first
            .get(&scope, &key("email"))
            .await
            .unwrap()
            .expect("document should exist");
        assert_eq!(stored.value.get("round"), Some(&json!(round)));
    }

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path().join("schools").join("4"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}
