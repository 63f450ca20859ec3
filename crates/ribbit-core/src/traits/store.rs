//! Persistent state store trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::RibbitResult;

/// Async key-value store for small JSON documents.
///
/// Implementations report failures honestly; the digest scheduler decides
/// which failures are recovered locally.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the value stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> RibbitResult<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: serde_json::Value) -> RibbitResult<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> RibbitResult<()>;

    /// Get the backend name (for logging).
    fn backend_name(&self) -> &str;
}

/// State store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoreProvider {
    Memory,
    #[default]
    JsonFile,
    Sqlite,
}
