//! Configuration system for ribbit.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{RibbitError, RibbitResult};
use crate::traits::StoreProvider;

/// Default EmailJS API base URL.
pub const DEFAULT_EMAILJS_BASE_URL: &str = "https://api.emailjs.com";

/// Longest accepted check interval (one week).
pub const MAX_CHECK_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Digest scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Display name used in digest subjects and headings.
    pub frog_name: String,
    /// Address that receives digests.
    pub recipient: String,
    /// Local hour (0-23) from which the automatic check may send.
    pub daily_hour: u32,
    /// Minutes between automatic checks.
    pub check_interval_minutes: u64,
    /// Run one check as soon as the runtime starts.
    pub run_on_start: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            frog_name: "Moist".to_string(),
            recipient: String::new(),
            daily_hour: 8,
            check_interval_minutes: 15,
            run_on_start: true,
        }
    }
}

/// EmailJS credentials and client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// API base URL (overridable for tests and proxies).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            template_id: None,
            public_key: None,
            base_url: DEFAULT_EMAILJS_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// State store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub provider: StoreProvider,
    /// Directory for the JSON file store, or database file for SQLite.
    pub path: PathBuf,
    /// File name prefix for the JSON file store.
    pub prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("ribbit"))
            .unwrap_or_else(|| PathBuf::from(".ribbit"));

        Self {
            provider: StoreProvider::JsonFile,
            path: data_dir,
            prefix: "ribbit_".to_string(),
        }
    }
}

/// Main ribbit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbitConfig {
    pub digest: DigestConfig,
    pub email: EmailConfig,
    pub store: StoreConfig,
}

impl RibbitConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RibbitResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| invalid_file(e.to_string()))?,
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| invalid_file(e.to_string()))?
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| invalid_file(e.to_string()))?
            }
            _ => {
                return Err(invalid_file(
                    "Unsupported config file format. Use .toml, .json, or .yaml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `RIBBIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Digest
        if let Some(name) = lookup("RIBBIT_FROG_NAME") {
            config.digest.frog_name = name;
        }
        if let Some(recipient) = lookup("RIBBIT_RECIPIENT_EMAIL") {
            config.digest.recipient = recipient;
        }
        if let Some(hour) = parse_var(&lookup, "RIBBIT_DAILY_HOUR") {
            config.digest.daily_hour = hour;
        }
        if let Some(minutes) = parse_var(&lookup, "RIBBIT_CHECK_INTERVAL_MINUTES") {
            config.digest.check_interval_minutes = minutes;
        }

        // EmailJS
        config.email.service_id = lookup("RIBBIT_EMAILJS_SERVICE_ID").filter(|v| !v.is_empty());
        config.email.template_id = lookup("RIBBIT_EMAILJS_TEMPLATE_ID").filter(|v| !v.is_empty());
        config.email.public_key = lookup("RIBBIT_EMAILJS_PUBLIC_KEY").filter(|v| !v.is_empty());
        if let Some(url) = lookup("RIBBIT_EMAILJS_BASE_URL") {
            config.email.base_url = url;
        }
        if let Some(secs) = parse_var(&lookup, "RIBBIT_EMAILJS_TIMEOUT_SECS") {
            config.email.timeout_secs = secs;
        }

        // Store
        if let Some(provider) = lookup("RIBBIT_STORE_PROVIDER") {
            config.store.provider = match provider.to_lowercase().as_str() {
                "memory" => StoreProvider::Memory,
                "sqlite" => StoreProvider::Sqlite,
                "json_file" | "json" | "file" => StoreProvider::JsonFile,
                other => {
                    warn!(provider = %other, "Unknown store provider, using json_file");
                    StoreProvider::JsonFile
                }
            };
        }
        if let Some(path) = lookup("RIBBIT_STORE_PATH") {
            config.store.path = PathBuf::from(path);
        }
        if let Some(prefix) = lookup("RIBBIT_STORE_PREFIX") {
            config.store.prefix = prefix;
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> RibbitConfigBuilder {
        RibbitConfigBuilder::default()
    }

    /// Check value ranges.
    pub fn validate(&self) -> RibbitResult<()> {
        if self.digest.daily_hour > 23 {
            return Err(RibbitError::validation_with_suggestion(
                format!("daily_hour must be 0-23, got {}", self.digest.daily_hour),
                "Use a local hour such as 8",
            ));
        }
        if self.digest.check_interval_minutes == 0 {
            return Err(RibbitError::validation(
                "check_interval_minutes must be at least 1",
            ));
        }
        if self.digest.check_interval_minutes > MAX_CHECK_INTERVAL_MINUTES {
            return Err(RibbitError::validation(format!(
                "check_interval_minutes must be at most {}, got {}",
                MAX_CHECK_INTERVAL_MINUTES, self.digest.check_interval_minutes
            )));
        }
        Ok(())
    }
}

fn invalid_file(message: impl Into<String>) -> RibbitError {
    RibbitError::Configuration(message.into())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = %key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

/// Builder for RibbitConfig.
#[derive(Default)]
pub struct RibbitConfigBuilder {
    config: RibbitConfig,
}

impl RibbitConfigBuilder {
    /// Set the frog name used in digests.
    pub fn frog_name(mut self, name: impl Into<String>) -> Self {
        self.config.digest.frog_name = name.into();
        self
    }

    /// Set the digest recipient.
    pub fn recipient(mut self, email: impl Into<String>) -> Self {
        self.config.digest.recipient = email.into();
        self
    }

    /// Set the hour from which automatic sends are allowed.
    pub fn daily_hour(mut self, hour: u32) -> Self {
        self.config.digest.daily_hour = hour;
        self
    }

    /// Set the automatic check interval, clamped to at least one minute.
    pub fn check_interval_minutes(mut self, minutes: u64) -> Self {
        self.config.digest.check_interval_minutes = minutes.max(1);
        self
    }

    /// Set EmailJS credentials.
    pub fn emailjs(
        mut self,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        self.config.email.service_id = Some(service_id.into());
        self.config.email.template_id = Some(template_id.into());
        self.config.email.public_key = Some(public_key.into());
        self
    }

    /// Set the email configuration.
    pub fn email(mut self, config: EmailConfig) -> Self {
        self.config.email = config;
        self
    }

    /// Set the store configuration.
    pub fn store(mut self, config: StoreConfig) -> Self {
        self.config.store = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> RibbitConfig {
        self.config
    }
}
