//! Exchange integration module
//!
//! Candle retrieval from the market-data vendor.

pub mod client;

pub use client::*;
