//! Digest content types passed between the scheduler, composer and transport.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Assignment, Interview, Job, Reminder, ResearchTarget};

/// Read-only view of the tracked entities at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub research_targets: Vec<ResearchTarget>,
}

impl Snapshot {
    pub fn new(jobs: Vec<Job>, research_targets: Vec<ResearchTarget>) -> Self {
        Self {
            jobs,
            research_targets,
        }
    }
}

/// An interview together with the company it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewWithCompany {
    pub company: String,
    #[serde(flatten)]
    pub interview: Interview,
}

/// An assignment together with the company it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentWithCompany {
    pub company: String,
    #[serde(flatten)]
    pub assignment: Assignment,
}

/// Aggregate counts for the weekly digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Every tracked job, whatever its stage.
    pub active_jobs: usize,
    /// Interviews starting within the next seven days.
    pub interviews_this_week: usize,
    pub research_targets: usize,
}

impl fmt::Display for WeeklySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Active: {}\nInterviews this week: {}\nResearch targets: {}",
            self.active_jobs, self.interviews_this_week, self.research_targets
        )
    }
}

/// Everything the composer needs for a daily digest.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    pub frog_name: String,
    pub reminders: Vec<Reminder>,
    pub today_interviews: Vec<InterviewWithCompany>,
    pub overdue_assignments: Vec<AssignmentWithCompany>,
}

/// Everything the composer needs for a weekly digest.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyDigest {
    pub frog_name: String,
    pub summary: String,
}

/// A composed email ready for the transport.
///
/// Credentials are optional here so that the transport, not the caller,
/// decides whether the configuration is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
}
