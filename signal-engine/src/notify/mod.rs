//! Alert delivery
//!
//! The engine hands finished messages to a [`Notifier`]. Delivery problems
//! are reported back as [`NotifyError`] so they can be logged; they never
//! stop the loop and are not retried.

use crate::error::NotifyError;
use async_trait::async_trait;

/// Destination for alert messages
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable notifier name for logs
    fn name(&self) -> &str;

    /// Deliver one message
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Stand-in used when delivery credentials are missing
#[derive(Debug, Clone)]
pub struct DisabledNotifier {
    reason: String,
}

impl DisabledNotifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Notifier for DisabledNotifier {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn notify(&self, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured(self.reason.clone()))
    }
}
