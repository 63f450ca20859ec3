//! Research target types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::job::{new_id, Job};

/// Stage of a research target (a fund or company being assessed before outreach).
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
pub enum ResearchStage {
    #[default]
    #[serde(alias = "Research")]
    #[strum(to_string = "Discovery", serialize = "Research")]
    Discovery,
    #[serde(alias = "Internal Assessment")]
    #[strum(to_string = "InternalAssessment", serialize = "Internal Assessment")]
    InternalAssessment,
    #[serde(alias = "Outreach Sent")]
    #[strum(to_string = "OutreachSent", serialize = "Outreach Sent")]
    OutreachSent,
    #[serde(alias = "In Conversation")]
    #[strum(to_string = "InConversation", serialize = "In Conversation")]
    InConversation,
    Converted,
    Dropped,
}

impl ResearchStage {
    /// Stages in which the target is still being researched internally.
    pub fn is_researching(&self) -> bool {
        matches!(self, ResearchStage::Discovery | ResearchStage::InternalAssessment)
    }
}

/// Lifecycle timestamps of a research target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchDates {
    pub added: DateTime<Utc>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outreach_sent: Option<DateTime<Utc>>,
}

impl ResearchDates {
    /// The most recent of `added` and `last_updated`.
    pub fn last_activity(&self) -> DateTime<Utc> {
        match self.last_updated {
            Some(updated) if updated > self.added => updated,
            _ => self.added,
        }
    }
}

/// A tracked research target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchTarget {
    pub id: String,
    pub fund_name: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub stage: ResearchStage,
    pub dates: ResearchDates,
    #[serde(default, alias = "notes")]
    pub research_notes: String,
}

impl ResearchTarget {
    /// Create a research target added (and last updated) at `added`.
    pub fn new(fund_name: impl Into<String>, added: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            fund_name: fund_name.into(),
            focus: String::new(),
            stage: ResearchStage::Discovery,
            dates: ResearchDates {
                added,
                last_updated: Some(added),
                outreach_sent: None,
            },
            research_notes: String::new(),
        }
    }

    /// Builder method to set the stage.
    pub fn in_stage(mut self, stage: ResearchStage) -> Self {
        self.stage = stage;
        self
    }

    /// Builder method to record outreach at the given instant.
    pub fn outreach_sent_at(mut self, sent: DateTime<Utc>) -> Self {
        self.stage = ResearchStage::OutreachSent;
        self.dates.outreach_sent = Some(sent);
        self
    }

    /// Build a freshly discovered job from this target. The target itself is
    /// left unchanged.
    pub fn to_job(&self, now: DateTime<Utc>) -> Job {
        let mut job = Job::new(self.fund_name.clone(), "Outreach", now);
        job.notes = format!("Converted from research: {}", self.research_notes);
        job
    }
}
