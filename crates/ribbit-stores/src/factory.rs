//! Factory for creating state stores.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use ribbit_core::config::StoreConfig;
use ribbit_core::error::{RibbitError, RibbitResult};
use ribbit_core::traits::{StateStore, StoreProvider};

/// Database file name used when the SQLite path is a directory.
const SQLITE_FILE_NAME: &str = "ribbit.db";

/// Factory for creating state stores.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store from the given configuration.
    pub fn create(config: &StoreConfig) -> RibbitResult<Arc<dyn StateStore>> {
        let store: Arc<dyn StateStore> = match config.provider {
            StoreProvider::Memory => Arc::new(crate::memory::InMemoryStore::new()),

            #[cfg(feature = "json-file")]
            StoreProvider::JsonFile => Arc::new(crate::json_file::JsonFileStore::new(
                &config.path,
                config.prefix.clone(),
            )?),

            #[cfg(feature = "sqlite")]
            StoreProvider::Sqlite => {
                Arc::new(crate::sqlite::SqliteStore::new(Self::sqlite_path(config))?)
            }

            #[allow(unreachable_patterns)]
            other => {
                return Err(RibbitError::configuration(format!(
                    "Store provider {} is not enabled in this build",
                    other
                )))
            }
        };

        info!(
            backend = store.backend_name(),
            path = %config.path.display(),
            "State store ready"
        );
        Ok(store)
    }

    /// Create an in-memory store.
    pub fn memory() -> Arc<dyn StateStore> {
        Arc::new(crate::memory::InMemoryStore::new())
    }

    /// Database file for the SQLite backend: the configured path, or
    /// `ribbit.db` inside it when it names a directory.
    pub fn sqlite_path(config: &StoreConfig) -> PathBuf {
        if config.path.extension().is_some() {
            config.path.clone()
        } else {
            config.path.join(SQLITE_FILE_NAME)
        }
    }
}
