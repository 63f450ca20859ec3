//! Background runtime for the digest scheduler.
//!
//! Sends are idempotent per period, so "once a day after 8 AM" and "once a
//! week on Monday" fall out of re-running [`DigestScheduler::run_auto_check`]
//! on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

use crate::config::DigestConfig;
use crate::digest::{AutoCheckReport, DigestScheduler};
use crate::error::{RibbitError, RibbitResult};

/// Configuration for the [`DigestRuntime`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Interval between automatic checks in minutes (default: 15).
    pub interval_minutes: u64,
    /// Whether to run one check immediately on start (default: true).
    pub run_on_start: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
            run_on_start: true,
        }
    }
}

impl RuntimeConfig {
    /// Create config with custom interval.
    pub fn with_interval(interval_minutes: u64) -> Self {
        Self {
            interval_minutes: interval_minutes.max(1),
            ..Default::default()
        }
    }

    /// Time between checks.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.max(1).saturating_mul(60))
    }

    /// Disable the initial check on start.
    pub fn without_run_on_start(mut self) -> Self {
        self.run_on_start = false;
        self
    }
}

impl From<&DigestConfig> for RuntimeConfig {
    fn from(config: &DigestConfig) -> Self {
        Self {
            interval_minutes: config.check_interval_minutes.max(1),
            run_on_start: config.run_on_start,
        }
    }
}

/// Periodic driver for [`DigestScheduler::run_auto_check`].
pub struct DigestRuntime {
    scheduler: JobScheduler,
    digests: Arc<DigestScheduler>,
    config: RuntimeConfig,
}

impl DigestRuntime {
    /// Create a runtime. Call `start()` to begin periodic checks.
    pub async fn new(digests: Arc<DigestScheduler>, config: RuntimeConfig) -> RibbitResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| RibbitError::Scheduler(format!("Failed to create job scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            digests,
            config,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Start periodic checks.
    pub async fn start(&self) -> RibbitResult<()> {
        let digests = self.digests.clone();
        let job = Job::new_repeated_async(self.config.interval(), move |_uuid, _lock| {
            let digests = digests.clone();
            Box::pin(async move {
                debug!("Starting periodic digest check");
                let report = digests.run_auto_check().await;
                log_report(&report);
            })
        })
        .map_err(|e| RibbitError::Scheduler(format!("Failed to create digest job: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| RibbitError::Scheduler(format!("Failed to add digest job: {}", e)))?;

        if self.config.run_on_start {
            debug!("Running initial digest check on start");
            let report = self.digests.run_auto_check().await;
            log_report(&report);
        }

        self.scheduler
            .start()
            .await
            .map_err(|e| RibbitError::Scheduler(format!("Failed to start job scheduler: {}", e)))?;

        info!(
            interval_minutes = self.config.interval_minutes,
            "Digest runtime started"
        );
        Ok(())
    }

    /// Run one check outside the interval.
    pub async fn run_now(&self) -> AutoCheckReport {
        self.digests.run_auto_check().await
    }

    /// Stop the runtime gracefully.
    pub async fn shutdown(&mut self) -> RibbitResult<()> {
        info!("Shutting down digest runtime");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| RibbitError::Scheduler(format!("Failed to shut down job scheduler: {}", e)))
    }
}

fn log_report(report: &AutoCheckReport) {
    info!(
        daily = ?report.daily,
        weekly = ?report.weekly,
        sent = report.sent_count(),
        "Digest check complete"
    );
}
