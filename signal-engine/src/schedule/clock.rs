//! Wall clock abstraction for the polling loop

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of "now" and of the wait between ticks.
///
/// The loop only ever talks to time through this trait, so the market-hours
/// gate and the cadence can be driven deterministically.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real time backed by tokio's timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
