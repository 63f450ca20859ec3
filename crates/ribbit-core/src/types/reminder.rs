//! Reminder types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::{Job, ResearchTarget};

/// Priority shared by jobs and reminders.
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
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Sort rank: high = 0, medium = 1, low = 2.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Reference to the entity a reminder was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderSubject {
    Job { id: String, company: String },
    ResearchTarget { id: String, fund_name: String },
}

impl ReminderSubject {
    pub fn id(&self) -> &str {
        match self {
            Self::Job { id, .. } | Self::ResearchTarget { id, .. } => id,
        }
    }

    /// Company or fund name.
    pub fn label(&self) -> &str {
        match self {
            Self::Job { company, .. } => company,
            Self::ResearchTarget { fund_name, .. } => fund_name,
        }
    }

    pub fn is_job(&self) -> bool {
        matches!(self, Self::Job { .. })
    }
}

impl From<&Job> for ReminderSubject {
    fn from(job: &Job) -> Self {
        Self::Job {
            id: job.id.clone(),
            company: job.company.clone(),
        }
    }
}

impl From<&ResearchTarget> for ReminderSubject {
    fn from(target: &ResearchTarget) -> Self {
        Self::ResearchTarget {
            id: target.id.clone(),
            fund_name: target.fund_name.clone(),
        }
    }
}

/// An actionable notice derived from a job or research target.
///
/// Reminders are recomputed on every evaluation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub priority: Priority,
    pub message: String,
    pub subject: ReminderSubject,
}

impl Reminder {
    pub fn new(
        priority: Priority,
        message: impl Into<String>,
        subject: impl Into<ReminderSubject>,
    ) -> Self {
        Self {
            priority,
            message: message.into(),
            subject: subject.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_and_names() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_subject_serialization() {
        let subject = ReminderSubject::ResearchTarget {
            id: "r1".to_string(),
            fund_name: "Lily Ventures".to_string(),
        };
        let json = serde_json::to_string(&subject).unwrap();
        assert!(json.contains("research_target"));
        assert_eq!(subject.label(), "Lily Ventures");
        assert!(!subject.is_job());
    }
}
