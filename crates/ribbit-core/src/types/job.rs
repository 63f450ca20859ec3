//! Job pipeline types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use super::datetime::deserialize_optional;
use super::Priority;

/// Stage of a job in the application pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum JobStage {
    #[default]
    Discovered,
    Applied,
    #[serde(alias = "First Contact")]
    #[strum(to_string = "FirstContact", serialize = "First Contact")]
    FirstContact,
    Assignment,
    Interview,
    Offer,
    Rejected,
}

/// Progress of a take-home assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    NotStarted,
    InProgress,
    Submitted,
}

/// A person attached to a job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
}

/// A scheduled interview.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interview {
    pub id: String,
    /// When the interview takes place. Interviews without a date never
    /// produce reminders.
    #[serde(deserialize_with = "deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer: Option<String>,
    pub notes: String,
}

impl Interview {
    /// Create an interview at the given instant.
    pub fn at(date: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            date: Some(date),
            ..Default::default()
        }
    }

    /// Display label: title, then kind, then "Interview".
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.kind.as_deref())
            .unwrap_or("Interview")
    }
}

/// A take-home assignment with a due date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    /// Assignments without a due date never produce reminders.
    #[serde(deserialize_with = "deserialize_optional")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
}

impl Assignment {
    /// Create an assignment due at the given instant.
    pub fn due(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            due_date: Some(due_date),
            status: AssignmentStatus::NotStarted,
        }
    }
}

/// Lifecycle timestamps of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDates {
    pub discovered: DateTime<Utc>,
    #[serde(default)]
    pub applied: Option<DateTime<Utc>>,
}

/// A tracked job opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub stage: JobStage,
    pub dates: JobDates,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub notes: String,
}

impl Job {
    /// Create a newly discovered job.
    pub fn new(company: impl Into<String>, role: impl Into<String>, discovered: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            company: company.into(),
            role: role.into(),
            priority: Priority::Low,
            stage: JobStage::Discovered,
            dates: JobDates {
                discovered,
                applied: None,
            },
            contacts: Vec::new(),
            interviews: Vec::new(),
            assignments: Vec::new(),
            notes: String::new(),
        }
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to mark the job applied at the given instant.
    pub fn applied_at(mut self, applied: DateTime<Utc>) -> Self {
        self.stage = JobStage::Applied;
        self.dates.applied = Some(applied);
        self
    }

    /// Returns a copy of this job moved to `stage`.
    pub fn with_stage(&self, stage: JobStage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    /// Returns a copy of this job with `interview` appended.
    pub fn with_interview(&self, interview: Interview) -> Self {
        let mut next = self.clone();
        next.interviews.push(interview);
        next
    }

    /// Returns a copy of this job with `assignment` appended.
    pub fn with_assignment(&self, assignment: Assignment) -> Self {
        let mut next = self.clone();
        next.assignments.push(assignment);
        next
    }

    /// Returns a copy of this job with `contact` appended.
    pub fn with_contact(&self, contact: Contact) -> Self {
        let mut next = self.clone();
        next.contacts.push(contact);
        next
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
