//! Technical indicators module
//!
//! Provides technical analysis indicators using the `ta` crate.

pub mod ema;

pub use ema::*;
