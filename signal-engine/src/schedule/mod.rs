//! Scheduling module
//!
//! Market-hours gate and the clock the polling loop runs on.

pub mod clock;
pub mod market_hours;

pub use clock::*;
pub use market_hours::*;
