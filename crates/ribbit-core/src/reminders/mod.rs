//! Reminder derivation from time-threshold rules.
//!
//! [`compute_reminders`] is a pure function of the snapshot and the current
//! time. Rules per source:
//! - Discovered job: nudge to apply after 48 hours
//! - Applied job: follow up from week 1, consider moving on from week 4
//! - Interviews starting within 2 days, assignments due within 24 hours
//! - Research targets: weekly check-ins, decision at week 5
//! - Outreach: follow up at 2 weeks, final follow-up at 4 weeks
//!
//! Windows are closed-open (`lower <= delta < upper`) and negative deltas
//! never match.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt::Display;

use crate::types::{Job, JobStage, Priority, Reminder, ResearchStage, ResearchTarget};

pub const MOVE_TO_APPLICATION: &str = "Move to Application stage (48hrs elapsed)";
pub const FOLLOW_UP_APPLIED: &str = "Follow up needed (1 week since applied)";
pub const CONSIDER_MOVING_ON: &str = "Consider moving on (4 weeks)";
pub const RESEARCH_DECISION: &str = "Week 5 — decision time: move forward or drop?";
pub const OUTREACH_FOLLOW_UP: &str = "Follow up on outreach (2 weeks)";
pub const OUTREACH_FINAL: &str = "Final follow-up or move on (4 weeks)";

/// Format used for the interview instant in prep reminders.
pub const INTERVIEW_TIME_FORMAT: &str = "%a %b %-d, %Y %H:%M";

/// Derive the ordered reminder list for `jobs` and `targets` at `now`.
///
/// Reminders are stably sorted by priority (high, medium, low). Equal
/// priorities keep enumeration order: jobs before research targets, each in
/// input order, and within a job the stage rule, then interviews, then
/// assignments. Interview times are rendered in the time zone of `now`.
pub fn compute_reminders<Tz>(
    jobs: &[Job],
    targets: &[ResearchTarget],
    now: &DateTime<Tz>,
) -> Vec<Reminder>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut all = Vec::new();

    for job in jobs {
        job_reminders(job, now, &mut all);
    }
    for target in targets {
        research_reminders(target, now, &mut all);
    }

    // Vec::sort_by_key is stable
    all.sort_by_key(|r| r.priority.rank());
    all
}

fn job_reminders<Tz>(job: &Job, now: &DateTime<Tz>, out: &mut Vec<Reminder>)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let now_utc = now.with_timezone(&Utc);

    match job.stage {
        JobStage::Discovered => {
            if now_utc - job.dates.discovered >= Duration::hours(48) {
                out.push(Reminder::new(job.priority, MOVE_TO_APPLICATION, job));
            }
        }
        JobStage::Applied => {
            if let Some(applied) = job.dates.applied {
                let elapsed = now_utc - applied;
                if elapsed >= Duration::days(7) && elapsed < Duration::days(28) {
                    out.push(Reminder::new(job.priority, FOLLOW_UP_APPLIED, job));
                } else if elapsed >= Duration::days(28) {
                    out.push(Reminder::new(Priority::Low, CONSIDER_MOVING_ON, job));
                }
            }
        }
        _ => {}
    }

    for interview in &job.interviews {
        let Some(date) = interview.date else {
            continue;
        };
        let until = date - now_utc;
        if until >= Duration::zero() && until <= Duration::days(2) {
            let local = date.with_timezone(&now.timezone());
            out.push(Reminder::new(
                Priority::High,
                format!("Prep needed: Interview on {}", local.format(INTERVIEW_TIME_FORMAT)),
                job,
            ));
        }
    }

    for assignment in &job.assignments {
        if is_due_within_day(assignment.due_date, now_utc) {
            out.push(Reminder::new(
                Priority::High,
                format!("Assignment due soon: {}", assignment.title),
                job,
            ));
        }
    }
}

fn research_reminders<Tz: TimeZone>(
    target: &ResearchTarget,
    now: &DateTime<Tz>,
    out: &mut Vec<Reminder>,
) {
    let now_utc = now.with_timezone(&Utc);

    if target.stage.is_researching() {
        let weeks = (now_utc - target.dates.last_activity()).num_weeks();
        if (1..5).contains(&weeks) {
            out.push(Reminder::new(
                Priority::Low,
                format!("Week {}: Continue research?", weeks),
                target,
            ));
        } else if weeks >= 5 {
            out.push(Reminder::new(Priority::Medium, RESEARCH_DECISION, target));
        }
    }

    if target.stage == ResearchStage::OutreachSent {
        if let Some(sent) = target.dates.outreach_sent {
            let elapsed = now_utc - sent;
            if elapsed >= Duration::days(14) && elapsed < Duration::days(28) {
                out.push(Reminder::new(Priority::Medium, OUTREACH_FOLLOW_UP, target));
            } else if elapsed >= Duration::days(28) {
                out.push(Reminder::new(Priority::Low, OUTREACH_FINAL, target));
            }
        }
    }
}

/// Whether `due` falls within `[now, now + 24h]`.
pub(crate) fn is_due_within_day(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due.map_or(false, |due| {
        let until = due - now;
        until >= Duration::zero() && until <= Duration::hours(24)
    })
}
