//! Low-above-EMA evaluator with per-candle dedup

use crate::data::Candle;
use crate::strategy::Signal;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Decides whether a closed candle triggers an alert.
///
/// Alerts iff the EMA is determinate and finite, `low > ema` strictly, and
/// the candle has not already alerted. The dedup cursor is the timestamp of
/// the last alerting candle; it starts empty and lives as long as the
/// evaluator.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    last_alerted: Option<DateTime<Utc>>,
}

impl SignalEvaluator {
    /// Create an evaluator with an empty dedup cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last candle that produced an alert
    pub fn last_alerted(&self) -> Option<DateTime<Utc>> {
        self.last_alerted
    }

    /// Evaluate `candle` against `ema`, advancing the cursor on alert only
    pub fn evaluate(&mut self, candle: &Candle, ema: Option<f64>) -> Signal {
        let ema_value = match ema {
            Some(v) if v.is_finite() => v,
            Some(v) => return Signal::hold(candle, Some(v), format!("EMA not a finite number ({})", v)),
            None => return Signal::hold(candle, None, "EMA indeterminate".to_string()),
        };

        if candle.low <= ema_value {
            return Signal::hold(
                candle,
                ema,
                format!("low {:.2} not above EMA {:.2}", candle.low, ema_value),
            );
        }

        if self.last_alerted == Some(candle.timestamp) {
            debug!("Candle {} already alerted", candle.timestamp);
            return Signal::hold(candle, ema, "already alerted for this candle".to_string());
        }

        self.last_alerted = Some(candle.timestamp);
        Signal::sell(candle, ema_value)
    }
}
