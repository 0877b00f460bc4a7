//! Polling loop
//!
//! One tick is: gate on market hours, fetch, compute the closed-candle EMA,
//! evaluate, maybe notify, then sleep for the poll interval. Every step runs
//! in sequence on the caller's task; the only state carried between ticks is
//! the evaluator's dedup cursor.

use crate::error::NotifyError;
use crate::exchange::CandleSource;
use crate::indicators::ClosedCandleEma;
use crate::notify::Notifier;
use crate::schedule::{Clock, MarketHours};
use crate::strategy::{format_signal_message, Signal, SignalEvaluator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Loop settings that are not part of any component
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Display name used in alerts and logs
    pub instrument_name: String,
    /// Wait between ticks
    pub poll_interval: Duration,
    /// Log would-be alerts instead of delivering them
    pub debug_mode: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            instrument_name: "SENSEX".to_string(),
            poll_interval: Duration::from_secs(300),
            debug_mode: false,
        }
    }
}

/// What a single cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Outside the session window, nothing fetched
    MarketClosed,
    /// Fetch produced no candles
    NoData,
    /// Too few candles for the EMA window
    InsufficientData { available: usize, required: usize },
    /// Evaluated, no alert
    NoSignal(Signal),
    /// Alert raised; `delivered` is false when the notifier failed
    Alerted { signal: Signal, delivered: bool },
    /// Alert raised but delivery skipped by debug mode
    DebugSuppressed(Signal),
}

/// Scheduler driving fetch → EMA → evaluate → notify
pub struct AlertEngine {
    source: Box<dyn CandleSource>,
    notifier: Box<dyn Notifier>,
    clock: Arc<dyn Clock>,
    hours: MarketHours,
    ema: ClosedCandleEma,
    evaluator: SignalEvaluator,
    settings: EngineSettings,
}

impl AlertEngine {
    pub fn new(
        source: Box<dyn CandleSource>,
        notifier: Box<dyn Notifier>,
        clock: Arc<dyn Clock>,
        hours: MarketHours,
        ema: ClosedCandleEma,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            clock,
            hours,
            ema,
            evaluator: SignalEvaluator::new(),
            settings,
        }
    }

    /// Evaluator state, mainly the dedup cursor
    pub fn evaluator(&self) -> &SignalEvaluator {
        &self.evaluator
    }

    /// Run one cycle without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let now = self.clock.now();
        if !self.hours.is_open(now) {
            info!(
                "⏱ Outside market hours ({})",
                self.hours.local(now).format("%a %Y-%m-%d %H:%M %Z")
            );
            return CycleOutcome::MarketClosed;
        }

        let candles = self.source.fetch_candles().await;
        if candles.is_empty() {
            warn!("No candle data from {} this cycle", self.source.name());
            return CycleOutcome::NoData;
        }

        let Some(reading) = self.ema.compute(&candles) else {
            let required = self.ema.required_candles();
            info!(
                "⏳ Collecting candles for EMA{}: {}/{}",
                self.ema.period(),
                candles.len(),
                required
            );
            return CycleOutcome::InsufficientData {
                available: candles.len(),
                required,
            };
        };

        let signal = self.evaluator.evaluate(&reading.candle, Some(reading.value));
        let candle_time = self
            .hours
            .local(signal.candle_time)
            .format("%H:%M")
            .to_string();

        if !signal.is_alert() {
            info!(
                "❌ No signal for {} candle {}: {}",
                self.settings.instrument_name, candle_time, signal.reason
            );
            return CycleOutcome::NoSignal(signal);
        }

        info!(
            "✅ {} SELL signal on {} candle: low {:.2}, close {:.2}, EMA{} {:.2}",
            self.settings.instrument_name,
            candle_time,
            signal.low,
            signal.close,
            self.ema.period(),
            reading.value
        );

        let message = format_signal_message(
            &signal,
            &self.settings.instrument_name,
            self.ema.period(),
            self.hours.timezone(),
        );

        if self.settings.debug_mode {
            info!("DEBUG_MODE enabled, alert not delivered:\n{}", message);
            return CycleOutcome::DebugSuppressed(signal);
        }

        let delivered = match self.notifier.notify(&message).await {
            Ok(()) => {
                info!("Alert delivered via {}", self.notifier.name());
                true
            }
            Err(NotifyError::NotConfigured(reason)) => {
                warn!("Alert not delivered, notifier disabled: {}", reason);
                false
            }
            Err(e) => {
                error!("Failed to deliver alert via {}: {}", self.notifier.name(), e);
                false
            }
        };

        CycleOutcome::Alerted { signal, delivered }
    }

    /// Run one cycle, then wait out the poll interval
    pub async fn tick(&mut self) -> CycleOutcome {
        let outcome = self.run_cycle().await;
        debug!("Cycle finished: {:?}", outcome);
        self.clock.sleep(self.settings.poll_interval).await;
        outcome
    }

    /// Poll until the task is dropped or the process exits
    pub async fn run(&mut self) {
        info!(
            "🚀 Monitoring {} candles via {} every {}s (session {}–{} {})",
            self.settings.instrument_name,
            self.source.name(),
            self.settings.poll_interval.as_secs(),
            self.hours.open().format("%H:%M"),
            self.hours.close().format("%H:%M"),
            self.hours.timezone()
        );
        loop {
            self.tick().await;
        }
    }
}
