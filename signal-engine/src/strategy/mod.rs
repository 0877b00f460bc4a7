//! Strategy engine module
//!
//! Signal records, the low-above-EMA evaluator and alert formatting.

pub mod evaluator;
pub mod signal;

pub use evaluator::*;
pub use signal::*;
