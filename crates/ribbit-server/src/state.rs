//! Server state management.

use std::sync::Arc;

use ribbit_core::config::RibbitConfig;
use ribbit_core::digest::DigestScheduler;
use ribbit_core::runtime::DigestRuntime;
use ribbit_core::traits::{DigestSource, StateStore};
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub scheduler: Arc<DigestScheduler>,
    pub source: Arc<dyn DigestSource>,
    pub store: Arc<dyn StateStore>,
    pub config: RibbitConfig,
    runtime: Mutex<Option<DigestRuntime>>,
}

impl AppState {
    /// Create application state from already-built components.
    pub fn new(
        scheduler: Arc<DigestScheduler>,
        source: Arc<dyn DigestSource>,
        store: Arc<dyn StateStore>,
        config: RibbitConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                scheduler,
                source,
                store,
                config,
                runtime: Mutex::new(None),
            }),
        }
    }

    pub fn scheduler(&self) -> &Arc<DigestScheduler> {
        &self.inner.scheduler
    }

    pub fn source(&self) -> &Arc<dyn DigestSource> {
        &self.inner.source
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.inner.store
    }

    pub fn config(&self) -> &RibbitConfig {
        &self.inner.config
    }

    /// Attach the running periodic check so it can be stopped on shutdown.
    pub async fn attach_runtime(&self, runtime: DigestRuntime) {
        *self.inner.runtime.lock().await = Some(runtime);
    }

    /// Take the attached runtime, if any.
    pub async fn take_runtime(&self) -> Option<DigestRuntime> {
        self.inner.runtime.lock().await.take()
    }
}
