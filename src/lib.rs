//! Robust Volatility Service Library
//!
//! Computes a smoothed, floored volatility estimate for a financial
//! instrument's price history: daily aggregation, exponentially weighted
//! standard deviation, an absolute minimum clamp, and a rolling-quantile
//! floor.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
