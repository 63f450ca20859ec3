//! SQLite state store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use ribbit_core::error::{RibbitError, RibbitResult};
use ribbit_core::traits::StateStore;

use crate::error::{read_error, write_error};
use crate::keys::validate_key;

/// Stores documents as JSON text in a single `kv` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    pub fn new(path: impl AsRef<Path>) -> RibbitResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                write_error(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| read_error(format!("Failed to open {}", path.display()), e))?;
        debug!(path = %path.display(), "Opened SQLite store");
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> RibbitResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| read_error("Failed to open in-memory database", e))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> RibbitResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
        "#,
        )
        .map_err(|e| write_error("Failed to initialise schema", e))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> RibbitResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RibbitError::internal("SQLite connection lock poisoned"))
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load(&self, key: &str) -> RibbitResult<Option<serde_json::Value>> {
        validate_key(key)?;
        let conn = self.conn()?;

        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| read_error(format!("Failed to load {}", key), e))?;

        raw.map(|text| {
            serde_json::from_str(&text)
                .map_err(|e| read_error(format!("Corrupt document {}", key), e))
        })
        .transpose()
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> RibbitResult<()> {
        validate_key(key)?;
        let text = serde_json::to_string(&value)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, text],
        )
        .map_err(|e| write_error(format!("Failed to save {}", key), e))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> RibbitResult<()> {
        validate_key(key)?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| write_error(format!("Failed to remove {}", key), e))?;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}
