//! Signal-Engine: intraday index alerting on a short EMA
//!
//! Polls a market-data API for 5-minute candles on one index, computes an
//! EMA of closing prices aligned to the last fully closed candle, and sends a
//! one-shot SELL alert when that candle's low trades strictly above the EMA.
//!
//! # Features
//!
//! - **Data Management**: candle model and vendor payload normalization
//! - **Exchange Integration**: HTTP candle source with bounded timeouts
//! - **Technical Indicators**: closed-candle EMA using `ta`
//! - **Strategy Engine**: low-above-EMA evaluator with per-candle dedup
//! - **Scheduling**: market-hours gate and injectable clock
//! - **Notification**: pluggable alert delivery
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use signal_engine::prelude::*;
//!
//! # async fn run(source: HttpCandleSource, hours: MarketHours) -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = AlertEngine::new(
//!     Box::new(source),
//!     Box::new(DisabledNotifier::new("no chat configured")),
//!     Arc::new(SystemClock),
//!     hours,
//!     ClosedCandleEma::new(5)?,
//!     EngineSettings::default(),
//! );
//! engine.run().await;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod indicators;
pub mod notify;
pub mod schedule;
pub mod strategy;

// Re-export commonly used types
pub mod prelude {
    pub use crate::data::*;
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::exchange::*;
    pub use crate::indicators::*;
    pub use crate::notify::*;
    pub use crate::schedule::*;
    pub use crate::strategy::*;
}
