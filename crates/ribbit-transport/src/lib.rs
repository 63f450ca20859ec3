//! ribbit-transport - Notification transports for ribbit.
//!
//! # Supported Backends
//!
//! - **EmailJS** (feature: `emailjs`) - EmailJS REST API

#[cfg(feature = "emailjs")]
mod emailjs;

#[cfg(feature = "emailjs")]
pub use emailjs::EmailJsTransport;

// Re-export core types
pub use ribbit_core::config::EmailConfig;
pub use ribbit_core::traits::NotificationTransport;
pub use ribbit_core::types::OutboundEmail;
