//! Persisted dedupe state and send results.

use serde::{Deserialize, Serialize};

use super::keys::{covers, parse_key, PeriodKind};

/// Store key under which [`SchedulerState`] is persisted.
pub const SCHEDULER_STATE_KEY: &str = "scheduler_meta";

/// Store key under which user-supplied EmailJS credentials are persisted.
pub const EMAIL_CONFIG_KEY: &str = "email_config";

/// Last period key for which each digest was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerState {
    #[serde(alias = "lastDaily")]
    pub last_daily_sent_key: Option<String>,
    #[serde(alias = "lastWeekly")]
    pub last_weekly_sent_key: Option<String>,
}

impl SchedulerState {
    pub fn key(&self, kind: PeriodKind) -> Option<&str> {
        match kind {
            PeriodKind::Daily => self.last_daily_sent_key.as_deref(),
            PeriodKind::Weekly => self.last_weekly_sent_key.as_deref(),
        }
    }

    /// Whether the digest of `kind` was already sent for the period `key`.
    ///
    /// A stored key for a later period also counts, matching `advance`,
    /// which never moves an unforced key backwards.
    pub fn is_sent(&self, kind: PeriodKind, key: &str) -> bool {
        self.key(kind).map_or(false, |stored| covers(stored, key))
    }

    /// Record a send for `key`.
    ///
    /// Keys only move forward: an unforced advance never replaces a stored
    /// key for a later period. Returns whether the stored key changed.
    pub fn advance(&mut self, kind: PeriodKind, key: &str, force: bool) -> bool {
        let slot = match kind {
            PeriodKind::Daily => &mut self.last_daily_sent_key,
            PeriodKind::Weekly => &mut self.last_weekly_sent_key,
        };

        if !force {
            if let Some(stored) = slot.as_deref() {
                if let (Some(stored), Some(next)) = (parse_key(stored), parse_key(key)) {
                    if stored > next {
                        return false;
                    }
                }
            }
        }

        if slot.as_deref() == Some(key) {
            return false;
        }
        *slot = Some(key.to_string());
        true
    }
}

/// EmailJS credentials as saved from the settings surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailCredentials {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

impl EmailCredentials {
    /// Whether any credential is present.
    pub fn any(&self) -> bool {
        [&self.service_id, &self.template_id, &self.public_key]
            .iter()
            .any(|v| v.as_deref().map_or(false, |s| !s.is_empty()))
    }

    /// Fill fields missing here from `fallback`.
    pub fn or(self, fallback: EmailCredentials) -> Self {
        fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
            primary.filter(|v| !v.is_empty()).or(fallback)
        }
        Self {
            service_id: pick(self.service_id, fallback.service_id),
            template_id: pick(self.template_id, fallback.template_id),
            public_key: pick(self.public_key, fallback.public_key),
        }
    }
}

/// Options for a manual digest send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendOptions {
    /// Send even when the current period was already sent.
    pub force: bool,
}

impl SendOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Reason reported when a digest was skipped as a duplicate.
pub const ALREADY_SENT: &str = "already_sent";

/// Result of a send operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestOutcome {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DigestOutcome {
    pub fn sent() -> Self {
        Self {
            sent: true,
            reason: None,
        }
    }

    pub fn already_sent() -> Self {
        Self {
            sent: false,
            reason: Some(ALREADY_SENT.to_string()),
        }
    }

    pub fn is_already_sent(&self) -> bool {
        !self.sent && self.reason.as_deref() == Some(ALREADY_SENT)
    }
}

/// Per-period result of an automatic check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodOutcome {
    /// Not yet eligible (too early, or not the anchor day).
    NotDue,
    Sent,
    AlreadySent,
    Failed { error: String },
    /// No email credentials configured; nothing was attempted.
    NotConfigured,
}

impl From<DigestOutcome> for PeriodOutcome {
    fn from(outcome: DigestOutcome) -> Self {
        if outcome.sent {
            PeriodOutcome::Sent
        } else {
            PeriodOutcome::AlreadySent
        }
    }
}

/// Result of [`DigestScheduler::run_auto_check`](super::DigestScheduler::run_auto_check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCheckReport {
    pub daily: PeriodOutcome,
    pub weekly: PeriodOutcome,
}

impl AutoCheckReport {
    pub fn not_configured() -> Self {
        Self {
            daily: PeriodOutcome::NotConfigured,
            weekly: PeriodOutcome::NotConfigured,
        }
    }

    /// Number of digests dispatched by this check.
    pub fn sent_count(&self) -> usize {
        [&self.daily, &self.weekly]
            .iter()
            .filter(|o| matches!(o, PeriodOutcome::Sent))
            .count()
    }
}
