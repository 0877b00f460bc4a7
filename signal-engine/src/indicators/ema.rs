//! EMA (Exponential Moving Average) indicator
//!
//! `ta`'s EMA uses `k = 2 / (period + 1)` and seeds with the first input,
//! which is exactly the recursive form the alert condition is defined on.

use crate::data::Candle;
use crate::error::IndicatorError;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

/// EMA value paired with the candle it is aligned to
#[derive(Debug, Clone, PartialEq)]
pub struct EmaReading {
    /// EMA of closes up to and including `candle`
    pub value: f64,
    /// Last fully closed candle in the window
    pub candle: Candle,
}

/// EMA over the closed part of a fetched window.
///
/// The newest element of a fetched window may still be forming, so it is
/// always excluded: for `n` candles the EMA runs over `candles[..n - 1]` and
/// the reading is aligned to `candles[n - 2]`. At least `period + 1` candles
/// are required; fewer yields `None` rather than a short-window estimate.
#[derive(Debug, Clone)]
pub struct ClosedCandleEma {
    prototype: ExponentialMovingAverage,
    period: usize,
}

impl ClosedCandleEma {
    /// Create a calculator for the given period
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let prototype = ExponentialMovingAverage::new(period)
            .map_err(|_| IndicatorError::InvalidPeriod(period))?;
        Ok(Self { prototype, period })
    }

    /// EMA period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Minimum window length, including the possibly in-progress candle
    pub fn required_candles(&self) -> usize {
        self.period() + 1
    }

    /// Compute the closed-candle EMA for an oldest-first window
    pub fn compute(&self, candles: &[Candle]) -> Option<EmaReading> {
        if candles.len() < self.required_candles() {
            return None;
        }

        let closed = &candles[..candles.len() - 1];
        let mut ema = self.prototype.clone();
        let value = closed.iter().fold(None, |_, c| Some(ema.next(c.close)))?;
        let candle = closed.last()?.clone();
        Some(EmaReading { value, candle })
    }
}
