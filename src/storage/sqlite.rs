/*!
 * SQLite-backed key-value store.
 *
 * Values are stored as JSON text in the `kv_store` table. Every call goes
 * through `spawn_blocking` so a flush never stalls the async runtime.
 */

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema;
use super::KeyValueStore;

const STATE_DIR: &str = "chapterglot";
const STATE_FILE: &str = "state.db";

/// Key-value store persisted in SQLite
#[derive(Clone)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory {}", parent.display()))?;
        }

        info!("Opening state store at {}", path.display());
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open state store {}", path.display()))?;

        Self::from_connection(path, conn)
    }

    /// Open the store under the user's local data directory
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory state store");
        let conn = Connection::open_in_memory().context("Failed to open in-memory state store")?;
        Self::from_connection(PathBuf::from(":memory:"), conn)
    }

    /// `<data dir>/chapterglot/state.db`
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine a data directory for the state store"))?;

        Ok(base.join(STATE_DIR).join(STATE_FILE))
    }

    /// Path of the underlying database
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn from_connection(path: PathBuf, conn: Connection) -> Result<Self> {
        schema::migrate(&conn)?;
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&conn.lock()))
            .await
            .context("State store task panicked")?
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();

        self.with_conn(move |conn| {
            let raw: Option<String> = conn
                .query_row("SELECT value FROM kv_store WHERE key = ?1", [&key], |row| row.get(0))
                .optional()?;

            raw.map(|text| {
                serde_json::from_str(&text)
                    .with_context(|| format!("Stored value for '{}' is not valid JSON", key))
            })
            .transpose()
        })
        .await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let key = key.to_string();
        let text = serde_json::to_string(&value)?;

        self.with_conn(move |conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, text, chrono::Utc::now().to_rfc3339()],
            )?;
            debug!("Stored key '{}'", key);
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [&key])?;
            Ok(())
        })
        .await
    }
}
