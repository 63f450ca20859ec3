//! HTML digest composer.

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, Local, Utc};
use tracing::debug;

use ribbit_core::error::{RibbitError, RibbitResult};
use ribbit_core::reminders::INTERVIEW_TIME_FORMAT;
use ribbit_core::traits::DigestComposer;
use ribbit_core::types::{DailyDigest, Priority, Reminder, WeeklyDigest};

const WRAPPER_STYLE: &str = "font-family: 'Book Antiqua', Palatino, serif; color:#123;";

/// Escape `&`, `<`, `>`, `"` and `'` for embedding in HTML text or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders digests as inline-styled HTML email bodies.
///
/// Every user-supplied string (frog name, company and fund names, messages,
/// titles, summary text) is escaped.
#[derive(Debug, Clone)]
pub struct HtmlDigestComposer {
    time_format: String,
    /// Offset used to render times; `None` renders in local time.
    offset: Option<FixedOffset>,
}

impl Default for HtmlDigestComposer {
    fn default() -> Self {
        Self {
            time_format: INTERVIEW_TIME_FORMAT.to_string(),
            offset: None,
        }
    }
}

impl HtmlDigestComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the strftime format for times.
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Builder method to render times at a fixed offset instead of local time.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    fn format_time(&self, time: Option<DateTime<Utc>>) -> String {
        let Some(time) = time else {
            return "no date".to_string();
        };
        match self.offset {
            Some(offset) => time.with_timezone(&offset).format(&self.time_format).to_string(),
            None => time.with_timezone(&Local).format(&self.time_format).to_string(),
        }
    }

    fn render_daily(&self, digest: &DailyDigest) -> Result<String, fmt::Error> {
        let (high, standard): (Vec<&Reminder>, Vec<&Reminder>) = digest
            .reminders
            .iter()
            .partition(|r| r.priority == Priority::High);

        let mut html = String::new();
        writeln!(html, "<div style=\"{}\">", WRAPPER_STYLE)?;
        writeln!(
            html,
            "<h2>🐸 {} &mdash; Daily Digest</h2>",
            escape_html(&digest.frog_name)
        )?;

        writeln!(html, "<h3>🔥 High Priority</h3>")?;
        write_list(&mut html, &high, "None", |r| {
            format!(
                "<strong>{}</strong> &mdash; {}",
                escape_html(r.subject.label()),
                escape_html(&r.message)
            )
        })?;

        writeln!(html, "<h3>📌 Standard</h3>")?;
        write_list(&mut html, &standard, "None", |r| {
            format!(
                "{} &mdash; {}",
                escape_html(r.subject.label()),
                escape_html(&r.message)
            )
        })?;

        writeln!(html, "<h3>📅 Today&#39;s Interviews</h3>")?;
        let interviews: Vec<_> = digest.today_interviews.iter().collect();
        write_list(&mut html, &interviews, "None today", |i| {
            format!(
                "{} &mdash; {}, {}",
                escape_html(&i.company),
                escape_html(i.interview.label()),
                escape_html(&self.format_time(i.interview.date))
            )
        })?;

        writeln!(html, "<h3>⚠️ Overdue Assignments</h3>")?;
        let assignments: Vec<_> = digest.overdue_assignments.iter().collect();
        write_list(&mut html, &assignments, "None", |a| {
            format!(
                "{} &mdash; {} (due {})",
                escape_html(&a.company),
                escape_html(&a.assignment.title),
                escape_html(&self.format_time(a.assignment.due_date))
            )
        })?;

        writeln!(html, "</div>")?;
        Ok(html)
    }

    fn render_weekly(&self, digest: &WeeklyDigest) -> Result<String, fmt::Error> {
        let mut html = String::new();
        writeln!(html, "<div style=\"{}\">", WRAPPER_STYLE)?;
        writeln!(
            html,
            "<h2>🐸 {} &mdash; Weekly Summary</h2>",
            escape_html(&digest.frog_name)
        )?;
        writeln!(
            html,
            "<pre style=\"white-space: pre-wrap\">{}</pre>",
            escape_html(&digest.summary)
        )?;
        writeln!(html, "</div>")?;
        Ok(html)
    }
}

fn write_list<T>(
    html: &mut String,
    items: &[&T],
    empty: &str,
    render: impl Fn(&T) -> String,
) -> fmt::Result {
    if items.is_empty() {
        return writeln!(html, "<p>{}</p>", empty);
    }
    html.push_str("<ul>");
    for item in items {
        write!(html, "<li>{}</li>", render(item))?;
    }
    writeln!(html, "</ul>")
}

impl DigestComposer for HtmlDigestComposer {
    fn build_daily_html(&self, digest: &DailyDigest) -> RibbitResult<String> {
        debug!(
            reminders = digest.reminders.len(),
            interviews = digest.today_interviews.len(),
            assignments = digest.overdue_assignments.len(),
            "Composing daily digest"
        );
        self.render_daily(digest)
            .map_err(|e| RibbitError::composition(format!("Failed to render daily digest: {}", e)))
    }

    fn build_weekly_html(&self, digest: &WeeklyDigest) -> RibbitResult<String> {
        self.render_weekly(digest)
            .map_err(|e| RibbitError::composition(format!("Failed to render weekly digest: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ribbit_core::types::{
        Assignment, AssignmentWithCompany, Interview, InterviewWithCompany, ReminderSubject,
    };

    fn composer() -> HtmlDigestComposer {
        HtmlDigestComposer::new().with_offset(FixedOffset::east_opt(0).unwrap())
    }

    fn job_subject(company: &str) -> ReminderSubject {
        ReminderSubject::Job {
            id: "j1".to_string(),
            company: company.to_string(),
        }
    }

    fn empty_daily() -> DailyDigest {
        DailyDigest {
            frog_name: "Moist".to_string(),
            reminders: Vec::new(),
            today_interviews: Vec::new(),
            overdue_assignments: Vec::new(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_empty_daily_sections() {
        let html = composer().build_daily_html(&empty_daily()).unwrap();
        assert!(html.contains("Moist &mdash; Daily Digest"));
        assert!(html.contains("<h3>🔥 High Priority</h3>\n<p>None</p>"));
        assert!(html.contains("<h3>📌 Standard</h3>\n<p>None</p>"));
        assert!(html.contains("<p>None today</p>"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_daily_splits_high_and_standard() {
        let mut digest = empty_daily();
        digest.reminders = vec![
            Reminder::new(Priority::High, "Prep needed", job_subject("Acme")),
            Reminder::new(Priority::Medium, "Follow up", job_subject("Globex")),
            Reminder::new(Priority::Low, "Consider moving on", job_subject("Initech")),
        ];

        let html = composer().build_daily_html(&digest).unwrap();
        let high = html.find("High Priority").unwrap();
        let standard = html.find("Standard").unwrap();
        let acme = html.find("<strong>Acme</strong> &mdash; Prep needed").unwrap();
        let globex = html.find("Globex &mdash; Follow up").unwrap();

        assert!(high < acme && acme < standard);
        assert!(standard < globex);
        assert!(html.contains("Initech &mdash; Consider moving on"));
    }

    #[test]
    fn test_daily_escapes_untrusted_fields() {
        let mut digest = empty_daily();
        digest.frog_name = "<Frog>".to_string();
        digest.reminders = vec![Reminder::new(
            Priority::High,
            "Assignment due soon: <script>alert(1)</script>",
            job_subject("Evil & Co <img>"),
        )];
        digest.overdue_assignments = vec![AssignmentWithCompany {
            company: "\"Quoted\"".to_string(),
            assignment: Assignment::due(
                "<b>take-home</b>",
                Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap(),
            ),
        }];

        let html = composer().build_daily_html(&digest).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img>"));
        assert!(!html.contains("<b>take-home"));
        assert!(html.contains("&lt;Frog&gt;"));
        assert!(html.contains("Evil &amp; Co &lt;img&gt;"));
        assert!(html.contains("&quot;Quoted&quot; &mdash; &lt;b&gt;take-home&lt;/b&gt;"));
    }

    #[test]
    fn test_daily_renders_times() {
        let mut digest = empty_daily();
        let mut interview = Interview::at(Utc.with_ymd_and_hms(2024, 6, 12, 15, 30, 0).unwrap());
        interview.title = Some("Onsite".to_string());
        digest.today_interviews = vec![InterviewWithCompany {
            company: "Acme".to_string(),
            interview,
        }];
        digest.overdue_assignments = vec![AssignmentWithCompany {
            company: "Acme".to_string(),
            assignment: Assignment::due(
                "Case study",
                Utc.with_ymd_and_hms(2024, 6, 13, 9, 0, 0).unwrap(),
            ),
        }];

        let html = composer().build_daily_html(&digest).unwrap();
        assert!(html.contains("Acme &mdash; Onsite, Wed Jun 12, 2024 15:30"));
        assert!(html.contains("Acme &mdash; Case study (due Thu Jun 13, 2024 09:00)"));
    }

    #[test]
    fn test_weekly_escapes_summary() {
        let digest = WeeklyDigest {
            frog_name: "Moist".to_string(),
            summary: "Active: 3\nInterviews this week: 1\nResearch targets: <2>".to_string(),
        };
        let html = composer().build_weekly_html(&digest).unwrap();
        assert!(html.contains("Moist &mdash; Weekly Summary"));
        assert!(html.contains("<pre style=\"white-space: pre-wrap\">Active: 3\nInterviews"));
        assert!(html.contains("Research targets: &lt;2&gt;</pre>"));
    }

    #[test]
    fn test_custom_time_format() {
        let composer = composer().with_time_format("%Y-%m-%d");
        let mut digest = empty_daily();
        digest.today_interviews = vec![InterviewWithCompany {
            company: "Acme".to_string(),
            interview: Interview::at(Utc.with_ymd_and_hms(2024, 6, 12, 15, 30, 0).unwrap()),
        }];
        let html = composer.build_daily_html(&digest).unwrap();
        assert!(html.contains("Acme &mdash; Interview, 2024-06-12"));
    }
}
