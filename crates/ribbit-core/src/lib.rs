//! ribbit-core - Core library for ribbit.
//!
//! This crate provides the domain types, the reminder engine, and the
//! idempotent digest scheduler for a job-search tracker.
//!
//! # Example
//!
//! ```ignore
//! use ribbit_core::{compute_reminders, DigestScheduler, SendOptions};
//!
//! let reminders = compute_reminders(&jobs, &targets, &chrono::Local::now());
//!
//! let scheduler = DigestScheduler::new(source, composer, transport, store, config);
//! let outcome = scheduler.send_daily(SendOptions::default()).await?;
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod reminders;
pub mod runtime;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{DigestConfig, EmailConfig, RibbitConfig, StoreConfig};
pub use digest::{
    AutoCheckReport, DigestOutcome, DigestScheduler, DigestSchedulerConfig, EmailCredentials,
    PeriodKind, PeriodOutcome, SchedulerState, SendOptions, SnapshotDigestSource,
    StoreSnapshotProvider,
};
pub use error::{ErrorCode, RibbitError, RibbitResult};
pub use reminders::compute_reminders;
pub use runtime::{DigestRuntime, RuntimeConfig};
pub use traits::{
    Clock, DigestComposer, DigestSource, NotificationTransport, SnapshotProvider, StateStore,
    StoreProvider, SystemClock,
};
pub use types::{
    Assignment, AssignmentStatus, Contact, DailyDigest, Interview, Job, JobStage, OutboundEmail,
    Priority, Reminder, ReminderSubject, ResearchStage, ResearchTarget, Snapshot, WeeklyDigest,
    WeeklySummary,
};
