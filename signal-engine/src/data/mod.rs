//! Data management module
//!
//! Candle model plus normalization of vendor payloads into it.

pub mod candle;
pub mod payload;

pub use candle::*;
pub use payload::*;
