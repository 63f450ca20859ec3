//! Snapshot and digest source traits.

use async_trait::async_trait;

use crate::error::RibbitResult;
use crate::types::{AssignmentWithCompany, InterviewWithCompany, Reminder, Snapshot};

/// Provides the current jobs and research targets as plain data.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> RibbitResult<Snapshot>;
}

/// Accessors the digest scheduler gathers content from.
#[async_trait]
pub trait DigestSource: Send + Sync {
    /// Current reminders, already ordered.
    async fn reminders(&self) -> RibbitResult<Vec<Reminder>>;

    /// Interviews on today's local calendar date.
    async fn today_interviews(&self) -> RibbitResult<Vec<InterviewWithCompany>>;

    /// Assignments due within the next 24 hours.
    async fn overdue_assignments(&self) -> RibbitResult<Vec<AssignmentWithCompany>>;

    /// Human-readable weekly summary text.
    async fn weekly_summary(&self) -> RibbitResult<String>;
}
