//! EmailJS transport implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use ribbit_core::config::EmailConfig;
use ribbit_core::error::{ErrorCode, RibbitError, RibbitResult};
use ribbit_core::traits::NotificationTransport;
use ribbit_core::types::OutboundEmail;

const SEND_PATH: &str = "/api/v1.0/email/send";

/// Sends digests through the EmailJS REST API.
///
/// Credentials travel with each [`OutboundEmail`], so one transport can
/// serve credentials that change at runtime.
pub struct EmailJsTransport {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_email: &'a str,
    subject: &'a str,
    message_html: &'a str,
}

impl EmailJsTransport {
    /// Create a new EmailJS transport.
    pub fn new(config: &EmailConfig) -> RibbitResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| {
                RibbitError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builder method to override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SEND_PATH)
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn request_error(e: reqwest::Error) -> RibbitError {
    let code = if e.is_timeout() {
        ErrorCode::TrnTimeout
    } else {
        ErrorCode::TrnConnectionFailed
    };
    RibbitError::Transport {
        message: format!("Failed to call EmailJS API: {}", e),
        code,
        status: None,
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl NotificationTransport for EmailJsTransport {
    async fn send_email(&self, email: &OutboundEmail) -> RibbitResult<()> {
        let (Some(service_id), Some(template_id), Some(public_key)) = (
            required(&email.service_id),
            required(&email.template_id),
            required(&email.public_key),
        ) else {
            return Err(RibbitError::configuration("Missing EmailJS config"));
        };

        let request = EmailJsRequest {
            service_id,
            template_id,
            user_id: public_key,
            template_params: TemplateParams {
                to_email: &email.to_email,
                subject: &email.subject,
                message_html: &email.html_body,
            },
        };

        debug!(subject = %email.subject, to = %email.to_email, "Sending email via EmailJS");

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "EmailJS rejected the request");
            return Err(RibbitError::transport_rejected(status.as_u16(), body));
        }

        Ok(())
    }

    fn transport_name(&self) -> &str {
        "emailjs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let transport = EmailJsTransport::new(&EmailConfig::default())
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            transport.endpoint(),
            "http://localhost:9000/api/v1.0/email/send"
        );
    }

    #[test]
    fn test_default_endpoint() {
        let transport = EmailJsTransport::new(&EmailConfig::default()).unwrap();
        assert_eq!(
            transport.endpoint(),
            "https://api.emailjs.com/api/v1.0/email/send"
        );
        assert_eq!(transport.transport_name(), "emailjs");
    }

    #[test]
    fn test_request_shape() {
        let request = EmailJsRequest {
            service_id: "svc",
            template_id: "tpl",
            user_id: "pk",
            template_params: TemplateParams {
                to_email: "me@example.com",
                subject: "Moist Daily Digest",
                message_html: "<p>hi</p>",
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_id"], "pk");
        assert_eq!(json["template_params"]["message_html"], "<p>hi</p>");
    }
}
