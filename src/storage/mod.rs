/*!
 * Persisted key-value state.
 *
 * Everything the engine remembers between sessions (glossaries, the copy
 * template, the ingestion queue, the content log, the API key) is stored as
 * JSON values under string keys. Callers receive the store as an injected
 * `Arc<dyn KeyValueStore>` so tests can swap SQLite for memory.
 *
 * - `schema`: table layout
 * - `sqlite`: SQLite-backed store
 * - `memory`: in-memory store
 * - `keys`: key naming
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod keys;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage capability: get, set and delete JSON values by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or was deleted
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Read and deserialize a value, falling back to `T::default()` when absent
pub async fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .with_context(|| format!("Failed to decode stored value for key '{}'", key)),
        None => Ok(T::default()),
    }
}

/// Serialize and write a value
pub async fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)
        .with_context(|| format!("Failed to encode value for key '{}'", key))?;
    store.set(key, value).await
}
