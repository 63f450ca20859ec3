//! In-memory state store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ribbit_core::error::RibbitResult;
use ribbit_core::traits::StateStore;

use crate::keys::validate_key;

/// Process-local store. Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn load(&self, key: &str) -> RibbitResult<Option<serde_json::Value>> {
        validate_key(key)?;
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> RibbitResult<()> {
        validate_key(key)?;
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> RibbitResult<()> {
        validate_key(key)?;
        self.data.write().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
