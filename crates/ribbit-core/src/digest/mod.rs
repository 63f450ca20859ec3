//! Digest scheduling.
//!
//! - [`keys`]: daily and weekly period keys
//! - [`state`]: persisted dedupe state and send results
//! - [`source`]: digest content computed from a snapshot
//! - [`scheduler`]: the idempotent send state machine

pub mod keys;
pub mod scheduler;
pub mod source;
pub mod state;

pub use keys::{daily_key, weekly_key, PeriodKind};
pub use scheduler::{DigestScheduler, DigestSchedulerConfig};
pub use source::{SnapshotDigestSource, StoreSnapshotProvider, JOBS_KEY, RESEARCH_KEY};
pub use state::{
    AutoCheckReport, DigestOutcome, EmailCredentials, PeriodOutcome, SchedulerState, SendOptions,
    ALREADY_SENT, EMAIL_CONFIG_KEY, SCHEDULER_STATE_KEY,
};
