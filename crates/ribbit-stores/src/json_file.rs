//! JSON file state store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use ribbit_core::error::RibbitResult;
use ribbit_core::traits::StateStore;

use crate::error::{read_error, write_error};
use crate::keys::validate_key;

/// Stores each key as `<dir>/<prefix><key>.json`.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    dir: PathBuf,
    prefix: String,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> RibbitResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            write_error(format!("Failed to create store directory {}", dir.display()), e)
        })?;

        debug!(dir = %dir.display(), "Opened JSON file store");
        Ok(Self {
            dir,
            prefix: prefix.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", self.prefix, key))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, key: &str) -> RibbitResult<Option<serde_json::Value>> {
        validate_key(key)?;
        let path = self.path_for(key);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_error(format!("Failed to read {}", path.display()), e)),
        };

        let value = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Stored document is not valid JSON");
            read_error(format!("Corrupt document {}", path.display()), e)
        })?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> RibbitResult<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| write_error(format!("Failed to write {}", tmp.display()), e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| write_error(format!("Failed to replace {}", path.display()), e))?;

        debug!(key = %key, path = %path.display(), "Saved document");
        Ok(())
    }

    async fn remove(&self, key: &str) -> RibbitResult<()> {
        validate_key(key)?;
        let path = self.path_for(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_error(format!("Failed to remove {}", path.display()), e)),
        }
    }

    fn backend_name(&self) -> &str {
        "json_file"
    }
}
