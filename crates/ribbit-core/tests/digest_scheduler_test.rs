//! Integration tests for the digest scheduler.
//!
//! Exercises dedupe, failure recovery and serialization of sends against
//! in-process fakes for the store, transport and clock.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use ribbit_core::digest::{EMAIL_CONFIG_KEY, SCHEDULER_STATE_KEY};
use ribbit_core::{
    AutoCheckReport, Clock, DailyDigest, DigestComposer, DigestOutcome, DigestScheduler,
    DigestSchedulerConfig, DigestSource, EmailCredentials, NotificationTransport, OutboundEmail,
    PeriodOutcome, Priority, Reminder, ReminderSubject, RibbitError, RibbitResult, SchedulerState,
    SendOptions, StateStore, WeeklyDigest,
};
use ribbit_core::types::{AssignmentWithCompany, InterviewWithCompany};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeStore {
    data: Mutex<HashMap<String, serde_json::Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.data.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: serde_json::Value) {
        self.data.lock().unwrap().insert(key.to_string(), value);
    }

    fn stored_state(&self) -> SchedulerState {
        self.get(SCHEDULER_STATE_KEY)
            .map(|v| serde_json::from_value(v).unwrap())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StateStore for FakeStore {
    async fn load(&self, key: &str) -> RibbitResult<Option<serde_json::Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RibbitError::storage_read("disk unavailable"));
        }
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> RibbitResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RibbitError::storage_write("disk full"));
        }
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> RibbitResult<()> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
struct FakeTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_all: AtomicBool,
    fail_daily: AtomicBool,
    delay: Option<Duration>,
}

impl FakeTransport {
    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.subject.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationTransport for FakeTransport {
    async fn send_email(&self, email: &OutboundEmail) -> RibbitResult<()> {
        if email.service_id.is_none() || email.template_id.is_none() || email.public_key.is_none()
        {
            return Err(RibbitError::configuration("Missing EmailJS config"));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all.load(Ordering::SeqCst)
            || (self.fail_daily.load(Ordering::SeqCst) && email.subject.contains("Daily"))
        {
            return Err(RibbitError::transport_rejected(503, "unavailable"));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn transport_name(&self) -> &str {
        "fake"
    }
}

struct FakeSource;

#[async_trait]
impl DigestSource for FakeSource {
    async fn reminders(&self) -> RibbitResult<Vec<Reminder>> {
        Ok(vec![Reminder::new(
            Priority::High,
            "Assignment due soon: Case study",
            ReminderSubject::Job {
                id: "j1".to_string(),
                company: "Acme".to_string(),
            },
        )])
    }

    async fn today_interviews(&self) -> RibbitResult<Vec<InterviewWithCompany>> {
        Ok(Vec::new())
    }

    async fn overdue_assignments(&self) -> RibbitResult<Vec<AssignmentWithCompany>> {
        Ok(Vec::new())
    }

    async fn weekly_summary(&self) -> RibbitResult<String> {
        Ok("Active: 1\nInterviews this week: 0\nResearch targets: 0".to_string())
    }
}

struct PlainComposer;

impl DigestComposer for PlainComposer {
    fn build_daily_html(&self, digest: &DailyDigest) -> RibbitResult<String> {
        Ok(format!("<p>{} reminders</p>", digest.reminders.len()))
    }

    fn build_weekly_html(&self, digest: &WeeklyDigest) -> RibbitResult<String> {
        Ok(format!("<pre>{}</pre>", digest.summary))
    }
}

struct ManualClock(Mutex<DateTime<Local>>);

impl ManualClock {
    fn new(now: DateTime<Local>) -> Self {
        Self(Mutex::new(now))
    }

    fn set(&self, now: DateTime<Local>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

// 2024-06-03 and 2024-06-10 are Mondays
fn tuesday() -> DateTime<Local> {
    at(2024, 6, 4, 9)
}

fn configured() -> DigestSchedulerConfig {
    DigestSchedulerConfig {
        recipient: "me@example.com".to_string(),
        credentials: EmailCredentials {
            service_id: Some("svc".to_string()),
            template_id: Some("tpl".to_string()),
            public_key: Some("pk".to_string()),
        },
        ..Default::default()
    }
}

struct Harness {
    store: Arc<FakeStore>,
    transport: Arc<FakeTransport>,
    clock: Arc<ManualClock>,
    scheduler: Arc<DigestScheduler>,
}

fn harness_with(
    transport: FakeTransport,
    config: DigestSchedulerConfig,
    now: DateTime<Local>,
) -> Harness {
    let store = Arc::new(FakeStore::default());
    let transport = Arc::new(transport);
    let clock = Arc::new(ManualClock::new(now));
    let scheduler = DigestScheduler::new(
        Arc::new(FakeSource),
        Arc::new(PlainComposer),
        transport.clone(),
        store.clone(),
        config,
    )
    .with_clock(clock.clone());

    Harness {
        store,
        transport,
        clock,
        scheduler: Arc::new(scheduler),
    }
}

fn harness(now: DateTime<Local>) -> Harness {
    harness_with(FakeTransport::default(), configured(), now)
}

// ---------------------------------------------------------------------------
// Manual sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_daily_sends_once_per_day_unless_forced() {
    let h = harness(tuesday());

    let first = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert_eq!(first, DigestOutcome::sent());

    let second = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert!(second.is_already_sent());
    assert_eq!(h.transport.count(), 1);

    let forced = h.scheduler.send_daily(SendOptions::forced()).await.unwrap();
    assert!(forced.sent);
    assert_eq!(h.transport.count(), 2);

    assert_eq!(
        h.store.stored_state().last_daily_sent_key.as_deref(),
        Some("2024-06-04")
    );
}

#[tokio::test]
async fn test_daily_email_fields() {
    let h = harness(tuesday());
    h.scheduler.send_daily(SendOptions::default()).await.unwrap();

    let sent = h.transport.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Moist Daily Digest");
    assert_eq!(sent[0].to_email, "me@example.com");
    assert_eq!(sent[0].service_id.as_deref(), Some("svc"));
    assert_eq!(sent[0].html_body, "<p>1 reminders</p>");
}

#[tokio::test]
async fn test_daily_resets_on_new_day() {
    let h = harness(tuesday());
    h.scheduler.send_daily(SendOptions::default()).await.unwrap();

    h.clock.set(at(2024, 6, 5, 7));
    let next = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert!(next.sent);
    assert_eq!(h.transport.count(), 2);
}

#[tokio::test]
async fn test_weekly_keys_on_monday_anchor() {
    let h = harness(tuesday());

    assert!(h.scheduler.send_weekly(SendOptions::default()).await.unwrap().sent);
    assert!(h
        .scheduler
        .send_weekly(SendOptions::default())
        .await
        .unwrap()
        .is_already_sent());
    assert_eq!(
        h.store.stored_state().last_weekly_sent_key.as_deref(),
        Some("2024-06-03")
    );

    h.clock.set(at(2024, 6, 10, 9));
    assert!(h.scheduler.send_weekly(SendOptions::default()).await.unwrap().sent);
    assert_eq!(
        h.store.stored_state().last_weekly_sent_key.as_deref(),
        Some("2024-06-10")
    );

    assert_eq!(
        h.transport.subjects(),
        vec!["Moist Weekly Summary", "Moist Weekly Summary"]
    );
}

#[tokio::test]
async fn test_daily_and_weekly_keys_are_independent() {
    let h = harness(tuesday());
    h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    h.scheduler.send_weekly(SendOptions::default()).await.unwrap();

    let state = h.store.stored_state();
    assert_eq!(state.last_daily_sent_key.as_deref(), Some("2024-06-04"));
    assert_eq!(state.last_weekly_sent_key.as_deref(), Some("2024-06-03"));
    assert_eq!(h.scheduler.state().await, state);
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_store_read_failure_treated_as_never_sent() {
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDailySentKey": "2024-06-04" }),
    );
    h.store.fail_reads.store(true, Ordering::SeqCst);

    let outcome = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert!(outcome.sent);
    assert_eq!(h.transport.count(), 1);
}

#[tokio::test]
async fn test_transport_failure_leaves_state_pending() {
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDailySentKey": "2024-06-03" }),
    );
    h.transport.fail_all.store(true, Ordering::SeqCst);

    let err = h
        .scheduler
        .send_daily(SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RibbitError::Transport { .. }));
    assert_eq!(
        h.store.stored_state().last_daily_sent_key.as_deref(),
        Some("2024-06-03")
    );

    // Retried on the next call once delivery works
    h.transport.fail_all.store(false, Ordering::SeqCst);
    assert!(h.scheduler.send_daily(SendOptions::default()).await.unwrap().sent);
}

#[tokio::test]
async fn test_read_fault_then_transport_failure_keeps_stored_key() {
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDailySentKey": "2024-06-03" }),
    );
    h.store.fail_reads.store(true, Ordering::SeqCst);
    h.transport.fail_all.store(true, Ordering::SeqCst);

    // Unreadable state means the send proceeds, then delivery fails
    let err = h
        .scheduler
        .send_daily(SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RibbitError::Transport { .. }));
    assert_eq!(h.transport.count(), 0);

    h.store.fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(
        h.scheduler.state().await.last_daily_sent_key.as_deref(),
        Some("2024-06-03")
    );
    assert_eq!(
        h.store.stored_state().last_daily_sent_key.as_deref(),
        Some("2024-06-03")
    );
}

#[tokio::test]
async fn test_store_write_failure_is_not_raised() {
    let h = harness(tuesday());
    h.store.fail_writes.store(true, Ordering::SeqCst);

    let outcome = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert!(outcome.sent);
    assert!(h.store.get(SCHEDULER_STATE_KEY).is_none());

    // Nothing was persisted, so the next call sends again
    let again = h.scheduler.send_daily(SendOptions::default()).await.unwrap();
    assert!(again.sent);
    assert_eq!(h.transport.count(), 2);
}

#[tokio::test]
async fn test_missing_credentials_is_configuration_error() {
    let h = harness_with(
        FakeTransport::default(),
        DigestSchedulerConfig::default(),
        tuesday(),
    );

    let err = h
        .scheduler
        .send_daily(SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RibbitError::Configuration(_)));
    assert!(h.store.get(SCHEDULER_STATE_KEY).is_none());
}

#[tokio::test]
async fn test_stored_credentials_take_precedence() {
    let h = harness_with(
        FakeTransport::default(),
        DigestSchedulerConfig::default(),
        tuesday(),
    );
    h.store.put(
        EMAIL_CONFIG_KEY,
        serde_json::json!({ "serviceId": "s", "templateId": "t", "publicKey": "k" }),
    );

    assert!(h.scheduler.send_daily(SendOptions::default()).await.unwrap().sent);
    let sent = h.transport.sent.lock().unwrap().clone();
    assert_eq!(sent[0].public_key.as_deref(), Some("k"));
}

#[tokio::test]
async fn test_later_stored_key_stops_repeat_sends() {
    // Clock behind the stored key, e.g. after a time zone change
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDailySentKey": "2024-06-10" }),
    );

    for _ in 0..3 {
        assert!(h
            .scheduler
            .send_daily(SendOptions::default())
            .await
            .unwrap()
            .is_already_sent());
        let report = h.scheduler.run_auto_check().await;
        assert_eq!(report.daily, PeriodOutcome::AlreadySent);
    }
    assert_eq!(h.transport.count(), 0);
    assert_eq!(
        h.store.stored_state().last_daily_sent_key.as_deref(),
        Some("2024-06-10")
    );
}

#[tokio::test]
async fn test_forced_send_behind_stored_key_then_dedupes() {
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDailySentKey": "2024-06-10" }),
    );

    assert!(h.scheduler.send_daily(SendOptions::forced()).await.unwrap().sent);
    assert_eq!(
        h.store.stored_state().last_daily_sent_key.as_deref(),
        Some("2024-06-04")
    );

    for _ in 0..3 {
        assert!(!h.scheduler.send_daily(SendOptions::default()).await.unwrap().sent);
        assert_eq!(h.scheduler.run_auto_check().await.daily, PeriodOutcome::AlreadySent);
    }
    assert_eq!(h.transport.count(), 1);
}

#[tokio::test]
async fn test_legacy_state_is_honored() {
    let h = harness(tuesday());
    h.store.put(
        SCHEDULER_STATE_KEY,
        serde_json::json!({ "lastDaily": "2024-6-4", "lastWeekly": "2024-6-3" }),
    );

    assert!(h
        .scheduler
        .send_daily(SendOptions::default())
        .await
        .unwrap()
        .is_already_sent());
    assert!(h
        .scheduler
        .send_weekly(SendOptions::default())
        .await
        .unwrap()
        .is_already_sent());
    assert_eq!(h.transport.count(), 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_concurrent_daily_sends_dispatch_once() {
    let h = harness_with(
        FakeTransport::slow(Duration::from_millis(50)),
        configured(),
        tuesday(),
    );

    let (a, b) = futures::join!(
        h.scheduler.send_daily(SendOptions::default()),
        h.scheduler.send_daily(SendOptions::default())
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    assert_eq!(outcomes.iter().filter(|o| o.sent).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| o.is_already_sent()).count(), 1);
    assert_eq!(h.transport.count(), 1);
}

#[tokio::test]
async fn test_concurrent_daily_and_weekly_keep_both_keys() {
    let h = harness_with(
        FakeTransport::slow(Duration::from_millis(20)),
        configured(),
        tuesday(),
    );

    let scheduler = h.scheduler.clone();
    let daily = tokio::spawn(async move { scheduler.send_daily(SendOptions::default()).await });
    let scheduler = h.scheduler.clone();
    let weekly = tokio::spawn(async move { scheduler.send_weekly(SendOptions::default()).await });

    assert!(daily.await.unwrap().unwrap().sent);
    assert!(weekly.await.unwrap().unwrap().sent);

    let state = h.store.stored_state();
    assert_eq!(state.last_daily_sent_key.as_deref(), Some("2024-06-04"));
    assert_eq!(state.last_weekly_sent_key.as_deref(), Some("2024-06-03"));
}

// ---------------------------------------------------------------------------
// Automatic check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_auto_check_on_monday_sends_both() {
    let h = harness(at(2024, 6, 3, 8));

    let report = h.scheduler.run_auto_check().await;
    assert_eq!(
        report,
        AutoCheckReport {
            daily: PeriodOutcome::Sent,
            weekly: PeriodOutcome::Sent,
        }
    );
    assert_eq!(h.transport.count(), 2);

    let report = h.scheduler.run_auto_check().await;
    assert_eq!(report.daily, PeriodOutcome::AlreadySent);
    assert_eq!(report.weekly, PeriodOutcome::AlreadySent);
    assert_eq!(h.transport.count(), 2);
}

#[tokio::test]
async fn test_auto_check_before_hour_does_nothing() {
    let h = harness(at(2024, 6, 3, 7));

    let report = h.scheduler.run_auto_check().await;
    assert_eq!(report.daily, PeriodOutcome::NotDue);
    assert_eq!(report.weekly, PeriodOutcome::NotDue);
    assert_eq!(h.transport.count(), 0);
}

#[tokio::test]
async fn test_auto_check_weekly_only_on_monday() {
    let h = harness(tuesday());

    let report = h.scheduler.run_auto_check().await;
    assert_eq!(report.daily, PeriodOutcome::Sent);
    assert_eq!(report.weekly, PeriodOutcome::NotDue);
}

#[tokio::test]
async fn test_auto_check_daily_failure_does_not_block_weekly() {
    let h = harness(at(2024, 6, 3, 9));
    h.transport.fail_daily.store(true, Ordering::SeqCst);

    let report = h.scheduler.run_auto_check().await;
    assert!(matches!(report.daily, PeriodOutcome::Failed { .. }));
    assert_eq!(report.weekly, PeriodOutcome::Sent);
    assert_eq!(h.transport.subjects(), vec!["Moist Weekly Summary"]);

    let state = h.store.stored_state();
    assert!(state.last_daily_sent_key.is_none());
    assert_eq!(state.last_weekly_sent_key.as_deref(), Some("2024-06-03"));
}

#[tokio::test]
async fn test_auto_check_without_credentials_is_noop() {
    let h = harness_with(
        FakeTransport::default(),
        DigestSchedulerConfig::default(),
        at(2024, 6, 3, 9),
    );

    let report = h.scheduler.run_auto_check().await;
    assert_eq!(report, AutoCheckReport::not_configured());
    assert_eq!(h.transport.count(), 0);
}
