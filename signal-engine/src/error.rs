//! Error types for the signal engine
//!
//! None of these stop the polling loop. They are logged where they occur and
//! the affected cycle degrades to "no data" or "not delivered".

use thiserror::Error;

/// Candle retrieval and payload normalization failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("candle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("candle API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed candle payload: {0}")]
    Payload(String),

    #[error("malformed candle at index {index}: {reason}")]
    Row { index: usize, reason: String },
}

/// Indicator construction failures
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("invalid EMA period {0}: must be at least 1")]
    InvalidPeriod(usize),
}

/// Market-hours configuration failures
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("market open {open} must be before market close {close}")]
    InvalidWindow { open: String, close: String },
}

/// Alert delivery failures
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier not configured: {0}")]
    NotConfigured(String),

    #[error("alert delivery failed: {0}")]
    Delivery(String),
}
