//! Route definitions for the REST API.

mod digests;
mod health;
mod reminders;
mod settings;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Reminders
        .route("/reminders", get(reminders::list_reminders))
        // Digests
        .route("/digests/daily", post(digests::send_daily))
        .route("/digests/weekly", post(digests::send_weekly))
        .route("/digests/state", get(digests::get_state))
        .route("/digests/check", post(digests::run_check))
        // Settings
        .route(
            "/settings/email",
            get(settings::get_email_settings).put(settings::put_email_settings),
        )
        .route("/settings/email/test", post(settings::send_test_email))
        // Attach state
        .with_state(state)
}

pub use digests::*;
pub use health::*;
pub use reminders::*;
pub use settings::*;
