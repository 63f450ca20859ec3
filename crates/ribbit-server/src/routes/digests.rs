//! Digest endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use ribbit_core::digest::{AutoCheckReport, DigestOutcome, PeriodKind, SchedulerState, SendOptions};

use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for a manual send. The body may be omitted entirely.
#[derive(Debug, Default, Deserialize)]
pub struct SendDigestRequest {
    #[serde(default)]
    pub force: bool,
}

async fn send(
    state: &AppState,
    kind: PeriodKind,
    request: Option<Json<SendDigestRequest>>,
) -> ApiResult<Json<DigestOutcome>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    info!(period = %kind, force = request.force, "Manual digest send requested");

    let outcome = state
        .scheduler()
        .send(kind, SendOptions { force: request.force })
        .await?;
    Ok(Json(outcome))
}

/// Send the daily digest.
/// POST /digests/daily
pub async fn send_daily(
    State(state): State<AppState>,
    request: Option<Json<SendDigestRequest>>,
) -> ApiResult<Json<DigestOutcome>> {
    send(&state, PeriodKind::Daily, request).await
}

/// Send the weekly summary.
/// POST /digests/weekly
pub async fn send_weekly(
    State(state): State<AppState>,
    request: Option<Json<SendDigestRequest>>,
) -> ApiResult<Json<DigestOutcome>> {
    send(&state, PeriodKind::Weekly, request).await
}

/// Current dedupe state.
/// GET /digests/state
pub async fn get_state(State(state): State<AppState>) -> ApiResult<Json<SchedulerState>> {
    Ok(Json(state.scheduler().state().await))
}

/// Run the automatic check now.
/// POST /digests/check
pub async fn run_check(State(state): State<AppState>) -> ApiResult<Json<AutoCheckReport>> {
    Ok(Json(state.scheduler().run_auto_check().await))
}
