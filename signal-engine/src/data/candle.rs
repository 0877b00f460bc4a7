//! OHLCV candle data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV candle data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time, always UTC
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Volume, when the vendor reports one (index feeds often don't)
    pub volume: Option<f64>,
}

impl Candle {
    /// Create a new candle without volume
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Set volume
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Ordered collection of candles, oldest first.
///
/// Construction sorts by timestamp and drops repeated timestamps (keeping the
/// later row), so timestamps are strictly increasing.
#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Create from vector of candles in any order
    pub fn from_vec(mut candles: Vec<Candle>) -> Self {
        // stable sort keeps vendor order among equal timestamps, so the
        // surviving duplicate is the one the vendor listed last
        candles.sort_by_key(|c| c.timestamp);
        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == candle.timestamp => *prev = candle,
                _ => deduped.push(candle),
            }
        }
        Self { candles: deduped }
    }

    /// Get number of candles
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Check if series is empty
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Get last candle
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Get all candles
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Get close prices as vector
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Keep only the most recent `count` candles
    pub fn truncate_to_recent(&mut self, count: usize) {
        if self.candles.len() > count {
            self.candles.drain(..self.candles.len() - count);
        }
    }

    /// Consume the series
    pub fn into_vec(self) -> Vec<Candle> {
        self.candles
    }
}

impl From<Vec<Candle>> for CandleSeries {
    fn from(candles: Vec<Candle>) -> Self {
        Self::from_vec(candles)
    }
}
