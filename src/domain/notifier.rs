//! Outbound OTP delivery collaborator.
//!
//! Delivery is fire-and-forget: the workflows decide *what* code to send
//! and *when* it expires, the notifier only transmits. Failures are logged
//! by the caller and never propagated to the client.

use anyhow::Result;
use std::sync::Arc;

/// Abstraction for sending a one-time password to a phone number.
#[async_trait::async_trait]
pub trait OtpNotifier: Send + Sync {
    // ---
    async fn send(&self, phone: &str, code: &str) -> Result<()>;
}

/// Type alias for any backend that implements OtpNotifier.
pub type OtpNotifierPtr = Arc<dyn OtpNotifier>;

/// Simulated delivery that writes the dispatch to the log.
///
/// Stands in for a real SMS gateway, which is out of scope.
pub struct LogNotifier;

#[async_trait::async_trait]
impl OtpNotifier for LogNotifier {
    // ---
    async fn send(&self, phone: &str, code: &str) -> Result<()> {
        tracing::info!(%phone, %code, "simulating OTP delivery");
        Ok(())
    }
}

/// Creates the log-backed notifier.
pub fn create_log_notifier() -> OtpNotifierPtr {
    // ---
    Arc::new(LogNotifier)
}
