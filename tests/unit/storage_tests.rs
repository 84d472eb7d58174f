/*!
 * Tests for the key-value stores
 */

use serde_json::json;
use tempfile::TempDir;

use chapterglot::storage::{self, keys, KeyValueStore, MemoryStore, SqliteStore};

async fn exercise_store(store: &dyn KeyValueStore) {
    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set(keys::COPY_MESSAGE, json!("{DATA}")).await.unwrap();
    store.set(keys::COPY_MESSAGE, json!("{DATA}\n{CONTEXT}")).await.unwrap();
    assert_eq!(store.get(keys::COPY_MESSAGE).await.unwrap(), Some(json!("{DATA}\n{CONTEXT}")));

    store.delete(keys::COPY_MESSAGE).await.unwrap();
    assert_eq!(store.get(keys::COPY_MESSAGE).await.unwrap(), None);

    // deleting twice is fine
    store.delete(keys::COPY_MESSAGE).await.unwrap();
}

#[tokio::test]
async fn test_memoryStore_shouldGetSetDelete() {
    let store = MemoryStore::new();
    exercise_store(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_sqliteStore_inMemory_shouldGetSetDelete() {
    let store = SqliteStore::new_in_memory().unwrap();
    exercise_store(&store).await;
}

#[tokio::test]
async fn test_sqliteStore_shouldPersistAcrossReopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("state.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store
            .set(&keys::local_names("42"), json!([{"original": "张伟", "translated": "Zhang Wei"}]))
            .await
            .unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(
        reopened.get("names:42").await.unwrap(),
        Some(json!([{"original": "张伟", "translated": "Zhang Wei"}]))
    );
}

#[tokio::test]
async fn test_loadOrDefault_withMissingKey_shouldReturnDefault() {
    let store = MemoryStore::new();

    let links: Vec<String> = storage::load_or_default(&store, &keys::links("1")).await.unwrap();

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_loadOrDefault_withWrongShape_shouldFail() {
    let store = MemoryStore::new();
    store.set(&keys::links("1"), json!({"not": "a list"})).await.unwrap();

    let result: anyhow::Result<Vec<String>> = storage::load_or_default(&store, &keys::links("1")).await;

    assert!(result.is_err());
}

#[test]
fn test_keys_shouldMatchPersistedLayout() {
    assert_eq!(keys::GLOBAL_NAMES, "names");
    assert_eq!(keys::local_names("7"), "names:7");
    assert_eq!(keys::links("7"), "links:7");
    assert_eq!(keys::contents("7"), "contents:7");
    assert_eq!(keys::API_KEY, "apiKey");
}
