//! Reminder endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use ribbit_core::types::{Priority, Reminder};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    pub reminders: Vec<Reminder>,
    pub total: usize,
    pub high: usize,
}

/// Current reminders, highest priority first.
/// GET /reminders
pub async fn list_reminders(State(state): State<AppState>) -> ApiResult<Json<RemindersResponse>> {
    let reminders = state.source().reminders().await?;
    let high = reminders
        .iter()
        .filter(|r| r.priority == Priority::High)
        .count();

    Ok(Json(RemindersResponse {
        total: reminders.len(),
        high,
        reminders,
    }))
}
