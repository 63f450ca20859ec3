//! Email settings endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use ribbit_core::digest::{DigestOutcome, EmailCredentials, SendOptions};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Which credentials are set. Values are never echoed back.
#[derive(Debug, Serialize)]
pub struct EmailSettingsResponse {
    pub service_id: bool,
    pub template_id: bool,
    pub public_key: bool,
    pub recipient: String,
}

impl EmailSettingsResponse {
    fn new(credentials: &EmailCredentials, recipient: &str) -> Self {
        let set = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.is_empty());
        Self {
            service_id: set(&credentials.service_id),
            template_id: set(&credentials.template_id),
            public_key: set(&credentials.public_key),
            recipient: recipient.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettingsRequest {
    #[serde(alias = "service_id")]
    pub service_id: String,
    #[serde(alias = "template_id")]
    pub template_id: String,
    #[serde(alias = "public_key")]
    pub public_key: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// GET /settings/email
pub async fn get_email_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<EmailSettingsResponse>> {
    let credentials = state.scheduler().credentials().await;
    Ok(Json(EmailSettingsResponse::new(
        &credentials,
        &state.scheduler().config().recipient,
    )))
}

/// Save EmailJS credentials.
/// PUT /settings/email
pub async fn put_email_settings(
    State(state): State<AppState>,
    Json(request): Json<EmailSettingsRequest>,
) -> ApiResult<Json<EmailSettingsResponse>> {
    let credentials = EmailCredentials {
        service_id: non_blank(&request.service_id),
        template_id: non_blank(&request.template_id),
        public_key: non_blank(&request.public_key),
    };
    if !credentials.any() {
        return Err(ApiError::validation("At least one EmailJS credential is required"));
    }

    state.scheduler().save_credentials(&credentials).await?;

    let effective = state.scheduler().credentials().await;
    Ok(Json(EmailSettingsResponse::new(
        &effective,
        &state.scheduler().config().recipient,
    )))
}

/// Send a forced daily digest to check the settings.
/// POST /settings/email/test
pub async fn send_test_email(State(state): State<AppState>) -> ApiResult<Json<DigestOutcome>> {
    Ok(Json(state.scheduler().send_daily(SendOptions::forced()).await?))
}
