//! Idempotent daily and weekly digest scheduler.
//!
//! Each digest is sent at most once per period unless forced. The last sent
//! period keys live in the state store under [`SCHEDULER_STATE_KEY`] and are
//! the only dedupe source of truth. A send runs check, compose, dispatch and
//! persist under a per-period lock, so concurrent callers for the same period
//! queue up and the second one observes the first one's key.

use chrono::{Datelike, Timelike, Weekday};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::keys::PeriodKind;
use super::state::{
    AutoCheckReport, DigestOutcome, EmailCredentials, PeriodOutcome, SchedulerState, SendOptions,
    EMAIL_CONFIG_KEY, SCHEDULER_STATE_KEY,
};
use crate::config::RibbitConfig;
use crate::error::RibbitResult;
use crate::traits::{
    Clock, DigestComposer, DigestSource, NotificationTransport, StateStore, SystemClock,
};
use crate::types::{DailyDigest, OutboundEmail, WeeklyDigest};

/// Settings the scheduler needs from [`RibbitConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSchedulerConfig {
    pub frog_name: String,
    pub recipient: String,
    /// Local hour from which the automatic check may send.
    pub daily_hour: u32,
    /// Credentials used when none are stored under `email_config`.
    pub credentials: EmailCredentials,
}

impl Default for DigestSchedulerConfig {
    fn default() -> Self {
        Self::from(&RibbitConfig::default())
    }
}

impl From<&RibbitConfig> for DigestSchedulerConfig {
    fn from(config: &RibbitConfig) -> Self {
        Self {
            frog_name: config.digest.frog_name.clone(),
            recipient: config.digest.recipient.clone(),
            daily_hour: config.digest.daily_hour,
            credentials: EmailCredentials {
                service_id: config.email.service_id.clone(),
                template_id: config.email.template_id.clone(),
                public_key: config.email.public_key.clone(),
            },
        }
    }
}

/// Orchestrates digest content, composition and delivery with persisted
/// dedupe state.
pub struct DigestScheduler {
    source: Arc<dyn DigestSource>,
    composer: Arc<dyn DigestComposer>,
    transport: Arc<dyn NotificationTransport>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    config: DigestSchedulerConfig,
    daily_lock: Mutex<()>,
    weekly_lock: Mutex<()>,
    /// Last state written or read by this scheduler.
    state: Mutex<SchedulerState>,
}

impl DigestScheduler {
    /// Create a scheduler using the system clock.
    pub fn new(
        source: Arc<dyn DigestSource>,
        composer: Arc<dyn DigestComposer>,
        transport: Arc<dyn NotificationTransport>,
        store: Arc<dyn StateStore>,
        config: DigestSchedulerConfig,
    ) -> Self {
        Self {
            source,
            composer,
            transport,
            store,
            clock: Arc::new(SystemClock),
            config,
            daily_lock: Mutex::new(()),
            weekly_lock: Mutex::new(()),
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Builder method to replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &DigestSchedulerConfig {
        &self.config
    }

    /// Send the daily digest unless it was already sent today.
    pub async fn send_daily(&self, options: SendOptions) -> RibbitResult<DigestOutcome> {
        self.send(PeriodKind::Daily, options).await
    }

    /// Send the weekly summary unless it was already sent this week.
    pub async fn send_weekly(&self, options: SendOptions) -> RibbitResult<DigestOutcome> {
        self.send(PeriodKind::Weekly, options).await
    }

    /// Send the digest of `kind`.
    ///
    /// # Errors
    /// Source, composer and transport failures are returned and leave the
    /// period pending. State store failures are logged and not returned.
    pub async fn send(&self, kind: PeriodKind, options: SendOptions) -> RibbitResult<DigestOutcome> {
        let _guard = match kind {
            PeriodKind::Daily => self.daily_lock.lock().await,
            PeriodKind::Weekly => self.weekly_lock.lock().await,
        };

        let now = self.clock.now();
        let key = kind.key_for(&now);

        if !options.force {
            let state = self.load_state().await;
            if state.is_sent(kind, &key) {
                debug!(period = %kind, key = %key, "Digest already sent for period");
                return Ok(DigestOutcome::already_sent());
            }
        }

        let (subject, html) = match kind {
            PeriodKind::Daily => self.compose_daily().await?,
            PeriodKind::Weekly => self.compose_weekly().await?,
        };
        self.dispatch(subject, html).await?;

        self.persist(kind, &key, options.force).await;

        info!(
            period = %kind,
            key = %key,
            forced = options.force,
            transport = self.transport.transport_name(),
            "Digest sent"
        );
        Ok(DigestOutcome::sent())
    }

    /// Send whichever digests are due.
    ///
    /// The daily digest is due from the configured hour once per local day;
    /// the weekly summary additionally only on Mondays. Does nothing when no
    /// email credentials are configured. Failures are logged and reported
    /// per period so a failed daily send does not block the weekly one.
    pub async fn run_auto_check(&self) -> AutoCheckReport {
        if !self.credentials().await.any() {
            debug!("No email credentials configured, skipping digest check");
            return AutoCheckReport::not_configured();
        }

        let now = self.clock.now();
        let state = self.load_state().await;
        let after_hour = now.hour() >= self.config.daily_hour;

        let daily = if !after_hour {
            PeriodOutcome::NotDue
        } else if state.is_sent(PeriodKind::Daily, &PeriodKind::Daily.key_for(&now)) {
            PeriodOutcome::AlreadySent
        } else {
            self.run_period(PeriodKind::Daily).await
        };

        let weekly = if !after_hour || now.weekday() != Weekday::Mon {
            PeriodOutcome::NotDue
        } else if state.is_sent(PeriodKind::Weekly, &PeriodKind::Weekly.key_for(&now)) {
            PeriodOutcome::AlreadySent
        } else {
            self.run_period(PeriodKind::Weekly).await
        };

        AutoCheckReport { daily, weekly }
    }

    /// Current dedupe state, falling back to the last known state when the
    /// store cannot be read.
    pub async fn state(&self) -> SchedulerState {
        match self.read_stored_state().await {
            Some(state) => {
                *self.state.lock().await = state.clone();
                state
            }
            None => self.state.lock().await.clone(),
        }
    }

    /// Effective EmailJS credentials: stored settings first, then configuration.
    pub async fn credentials(&self) -> EmailCredentials {
        let stored = match self.store.load(EMAIL_CONFIG_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed stored email config");
                EmailCredentials::default()
            }),
            Ok(None) => EmailCredentials::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored email config");
                EmailCredentials::default()
            }
        };
        stored.or(self.config.credentials.clone())
    }

    /// Store credentials under `email_config`.
    pub async fn save_credentials(&self, credentials: &EmailCredentials) -> RibbitResult<()> {
        self.store
            .save(EMAIL_CONFIG_KEY, serde_json::to_value(credentials)?)
            .await
    }

    async fn run_period(&self, kind: PeriodKind) -> PeriodOutcome {
        match self.send(kind, SendOptions::default()).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                error!(period = %kind, error = %e, code = e.code().as_str(), "Automatic digest send failed");
                PeriodOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn compose_daily(&self) -> RibbitResult<(String, String)> {
        let digest = DailyDigest {
            frog_name: self.config.frog_name.clone(),
            reminders: self.source.reminders().await?,
            today_interviews: self.source.today_interviews().await?,
            overdue_assignments: self.source.overdue_assignments().await?,
        };
        let html = self.composer.build_daily_html(&digest)?;
        Ok((format!("{} Daily Digest", self.config.frog_name), html))
    }

    async fn compose_weekly(&self) -> RibbitResult<(String, String)> {
        let digest = WeeklyDigest {
            frog_name: self.config.frog_name.clone(),
            summary: self.source.weekly_summary().await?,
        };
        let html = self.composer.build_weekly_html(&digest)?;
        Ok((format!("{} Weekly Summary", self.config.frog_name), html))
    }

    async fn dispatch(&self, subject: String, html_body: String) -> RibbitResult<()> {
        let credentials = self.credentials().await;
        let email = OutboundEmail {
            service_id: credentials.service_id,
            template_id: credentials.template_id,
            public_key: credentials.public_key,
            to_email: self.config.recipient.clone(),
            subject,
            html_body,
        };
        self.transport.send_email(&email).await
    }

    /// Stored state, or the default when it cannot be read.
    async fn load_state(&self) -> SchedulerState {
        match self.read_stored_state().await {
            Some(state) => {
                *self.state.lock().await = state.clone();
                state
            }
            None => SchedulerState::default(),
        }
    }

    async fn read_stored_state(&self) -> Option<SchedulerState> {
        match self.store.load(SCHEDULER_STATE_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(error = %e, "Malformed scheduler state, treating as never sent");
                    None
                }
            },
            Ok(None) => Some(SchedulerState::default()),
            Err(e) => {
                warn!(
                    error = %e,
                    backend = self.store.backend_name(),
                    "Failed to read scheduler state, treating as never sent"
                );
                None
            }
        }
    }

    /// Record a completed send. Write failures are logged, not returned.
    async fn persist(&self, kind: PeriodKind, key: &str, force: bool) {
        let mut cached = self.state.lock().await;

        let mut state = match self.store.load(SCHEDULER_STATE_KEY).await {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|_| cached.clone()),
            _ => cached.clone(),
        };
        state.advance(kind, key, force);

        match serde_json::to_value(&state) {
            Ok(value) => {
                if let Err(e) = self.store.save(SCHEDULER_STATE_KEY, value).await {
                    error!(
                        period = %kind,
                        key = %key,
                        error = %e,
                        "Failed to persist scheduler state, digest may be sent again"
                    );
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize scheduler state"),
        }

        *cached = state;
    }
}
