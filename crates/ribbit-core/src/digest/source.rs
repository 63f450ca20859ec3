//! Digest content gathered from a snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::error::RibbitResult;
use crate::reminders::{compute_reminders, is_due_within_day};
use crate::traits::{Clock, DigestSource, SnapshotProvider, StateStore};
use crate::types::{
    AssignmentWithCompany, InterviewWithCompany, Job, Reminder, ResearchTarget, Snapshot,
    WeeklySummary,
};

/// Store key holding the job list.
pub const JOBS_KEY: &str = "jobs";
/// Store key holding the research target list.
pub const RESEARCH_KEY: &str = "research";

/// Interviews whose date falls on the local calendar date of `now`.
pub fn today_interviews<Tz: TimeZone>(
    jobs: &[Job],
    now: &DateTime<Tz>,
) -> Vec<InterviewWithCompany> {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut out = Vec::new();

    for job in jobs {
        for interview in &job.interviews {
            let Some(date) = interview.date else {
                continue;
            };
            if date.with_timezone(&tz).date_naive() == today {
                out.push(InterviewWithCompany {
                    company: job.company.clone(),
                    interview: interview.clone(),
                });
            }
        }
    }
    out
}

/// Assignments due within the next 24 hours.
pub fn due_assignments<Tz: TimeZone>(
    jobs: &[Job],
    now: &DateTime<Tz>,
) -> Vec<AssignmentWithCompany> {
    let now_utc = now.with_timezone(&Utc);

    jobs.iter()
        .flat_map(|job| {
            job.assignments
                .iter()
                .filter(move |a| is_due_within_day(a.due_date, now_utc))
                .map(move |a| AssignmentWithCompany {
                    company: job.company.clone(),
                    assignment: a.clone(),
                })
        })
        .collect()
}

/// Aggregate counts for the weekly digest.
pub fn weekly_summary<Tz: TimeZone>(
    jobs: &[Job],
    targets: &[ResearchTarget],
    now: &DateTime<Tz>,
) -> WeeklySummary {
    let now_utc = now.with_timezone(&Utc);
    let in_next_week = |date: Option<DateTime<Utc>>| {
        date.map_or(false, |d| {
            let until = d - now_utc;
            until >= Duration::zero() && until <= Duration::days(7)
        })
    };

    WeeklySummary {
        active_jobs: jobs.len(),
        interviews_this_week: jobs
            .iter()
            .flat_map(|j| j.interviews.iter())
            .filter(|i| in_next_week(i.date))
            .count(),
        research_targets: targets.len(),
    }
}

/// [`DigestSource`] computing each accessor from a fresh snapshot.
pub struct SnapshotDigestSource {
    provider: Arc<dyn SnapshotProvider>,
    clock: Arc<dyn Clock>,
}

impl SnapshotDigestSource {
    pub fn new(provider: Arc<dyn SnapshotProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }
}

#[async_trait]
impl DigestSource for SnapshotDigestSource {
    async fn reminders(&self) -> RibbitResult<Vec<Reminder>> {
        let snapshot = self.provider.snapshot().await?;
        let now = self.clock.now();
        Ok(compute_reminders(
            &snapshot.jobs,
            &snapshot.research_targets,
            &now,
        ))
    }

    async fn today_interviews(&self) -> RibbitResult<Vec<InterviewWithCompany>> {
        let snapshot = self.provider.snapshot().await?;
        Ok(today_interviews(&snapshot.jobs, &self.clock.now()))
    }

    async fn overdue_assignments(&self) -> RibbitResult<Vec<AssignmentWithCompany>> {
        let snapshot = self.provider.snapshot().await?;
        Ok(due_assignments(&snapshot.jobs, &self.clock.now()))
    }

    async fn weekly_summary(&self) -> RibbitResult<String> {
        let snapshot = self.provider.snapshot().await?;
        let summary = weekly_summary(
            &snapshot.jobs,
            &snapshot.research_targets,
            &self.clock.now(),
        );
        Ok(summary.to_string())
    }
}

/// [`SnapshotProvider`] reading the `jobs` and `research` documents of a store.
///
/// Missing documents are treated as empty lists.
pub struct StoreSnapshotProvider {
    store: Arc<dyn StateStore>,
}

impl StoreSnapshotProvider {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    async fn load_list<T: serde::de::DeserializeOwned>(&self, key: &str) -> RibbitResult<Vec<T>> {
        match self.store.load(key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => {
                debug!(key = %key, backend = self.store.backend_name(), "No stored document");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl SnapshotProvider for StoreSnapshotProvider {
    async fn snapshot(&self) -> RibbitResult<Snapshot> {
        let jobs = self.load_list(JOBS_KEY).await?;
        let research_targets = self.load_list(RESEARCH_KEY).await?;
        Ok(Snapshot::new(jobs, research_targets))
    }
}

/// A fixed snapshot, mostly useful for embedding and tests.
#[async_trait]
impl SnapshotProvider for Snapshot {
    async fn snapshot(&self) -> RibbitResult<Snapshot> {
        Ok(self.clone())
    }
}
