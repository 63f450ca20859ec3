//! ribbit-compose - Digest composers for ribbit.
//!
//! # Supported Formats
//!
//! - **HTML** (feature: `html`) - inline-styled HTML email bodies

#[cfg(feature = "html")]
mod html;

#[cfg(feature = "html")]
pub use html::{escape_html, HtmlDigestComposer};

// Re-export core types
pub use ribbit_core::traits::DigestComposer;
pub use ribbit_core::types::{DailyDigest, WeeklyDigest};
