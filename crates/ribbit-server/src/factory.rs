//! Builds the digest pipeline from configuration.

use std::sync::Arc;

use ribbit_compose::HtmlDigestComposer;
use ribbit_core::config::RibbitConfig;
use ribbit_core::digest::{
    DigestScheduler, DigestSchedulerConfig, SnapshotDigestSource, StoreSnapshotProvider,
};
use ribbit_core::error::RibbitResult;
use ribbit_core::traits::{Clock, DigestSource, SystemClock};
use ribbit_stores::StoreFactory;
use ribbit_transport::EmailJsTransport;
use tracing::info;

use crate::state::AppState;

/// Create the application state: store, snapshot source, HTML composer,
/// EmailJS transport and scheduler, all sharing one store.
pub fn create_state(config: RibbitConfig) -> RibbitResult<AppState> {
    config.validate()?;

    let store = StoreFactory::create(&config.store)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let provider = Arc::new(StoreSnapshotProvider::new(store.clone()));
    let source: Arc<dyn DigestSource> =
        Arc::new(SnapshotDigestSource::new(provider, clock.clone()));
    let transport = Arc::new(EmailJsTransport::new(&config.email)?);

    let scheduler = DigestScheduler::new(
        source.clone(),
        Arc::new(HtmlDigestComposer::new()),
        transport,
        store.clone(),
        DigestSchedulerConfig::from(&config),
    )
    .with_clock(clock);

    info!(
        frog_name = %config.digest.frog_name,
        store = store.backend_name(),
        "Digest pipeline created"
    );

    Ok(AppState::new(Arc::new(scheduler), source, store, config))
}
