//! Signal records and alert message formatting

use crate::data::Candle;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Signal type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    /// Low closed above the short EMA
    Sell,
    /// No action
    Hold,
}

/// Outcome of evaluating one closed candle
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Signal type
    pub signal_type: SignalType,
    /// Open time of the evaluated candle
    pub candle_time: DateTime<Utc>,
    /// Candle low
    pub low: f64,
    /// Candle close
    pub close: f64,
    /// EMA at evaluation time, `None` when indeterminate
    pub ema: Option<f64>,
    /// Reason for signal
    pub reason: String,
}

impl Signal {
    /// Create sell signal
    pub fn sell(candle: &Candle, ema: f64) -> Self {
        Self {
            signal_type: SignalType::Sell,
            candle_time: candle.timestamp,
            low: candle.low,
            close: candle.close,
            ema: Some(ema),
            reason: format!("low {:.2} above EMA {:.2}", candle.low, ema),
        }
    }

    /// Create hold signal
    pub fn hold(candle: &Candle, ema: Option<f64>, reason: String) -> Self {
        Self {
            signal_type: SignalType::Hold,
            candle_time: candle.timestamp,
            low: candle.low,
            close: candle.close,
            ema,
            reason,
        }
    }

    /// Whether this signal should be delivered
    pub fn is_alert(&self) -> bool {
        self.signal_type == SignalType::Sell
    }
}

/// Render an alert for chat delivery.
///
/// Candle time is shown in the exchange zone.
pub fn format_signal_message(signal: &Signal, instrument: &str, ema_period: usize, tz: Tz) -> String {
    let candle_time = signal.candle_time.with_timezone(&tz).format("%Y-%m-%d %H:%M");
    let ema = signal
        .ema
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "🚀 {} SELL Signal\n\nCandle Time: {}\nLow: {}\nClose: {}\nEMA{}: {}",
        instrument, candle_time, signal.low, signal.close, ema_period, ema
    )
}
