//! Digest composer trait.

use crate::error::RibbitResult;
use crate::types::{DailyDigest, WeeklyDigest};

/// Renders digest data into notification content.
///
/// Composition runs in-process and synchronously. Implementations must
/// escape every untrusted text field they embed.
pub trait DigestComposer: Send + Sync {
    /// Render the daily digest body.
    fn build_daily_html(&self, digest: &DailyDigest) -> RibbitResult<String>;

    /// Render the weekly digest body.
    fn build_weekly_html(&self, digest: &WeeklyDigest) -> RibbitResult<String>;
}
