/*!
 * State store schema.
 *
 * Persisted state is a single key-value table. The values themselves carry
 * no version: changing their JSON shape is a breaking change. The table
 * layout is versioned through SQLite's `user_version` pragma.
 */

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Layout version written to `user_version`
pub const LAYOUT_VERSION: i32 = 1;

const CREATE_KV_STORE: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Bring a freshly opened connection up to `LAYOUT_VERSION`
pub fn migrate(conn: &Connection) -> Result<()> {
    let found = layout_version(conn)?;

    match found {
        0 => {
            info!("Creating state store layout v{}", LAYOUT_VERSION);
            // Readers keep going while a write-through flush is in progress
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute_batch(CREATE_KV_STORE)
                .context("Failed to create kv_store table")?;
            conn.pragma_update(None, "user_version", LAYOUT_VERSION)?;
        }
        LAYOUT_VERSION => debug!("State store layout is current (v{})", found),
        newer => bail!(
            "State store layout v{} is newer than supported v{}",
            newer,
            LAYOUT_VERSION
        ),
    }

    Ok(())
}

fn layout_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .context("Failed to read state store layout version")
}
