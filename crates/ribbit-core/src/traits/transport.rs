//! Notification transport trait.

use async_trait::async_trait;

use crate::error::RibbitResult;
use crate::types::OutboundEmail;

/// Delivers composed content to a recipient.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Send one email.
    ///
    /// # Errors
    /// - `RibbitError::Configuration` when the service id, template id or
    ///   public key is missing.
    /// - `RibbitError::Transport` when delivery fails.
    async fn send_email(&self, email: &OutboundEmail) -> RibbitResult<()>;

    /// Get the transport name (for logging).
    fn transport_name(&self) -> &str;
}
