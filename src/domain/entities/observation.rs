use serde::{Deserialize, Serialize};

/// A single raw price observation as stored in the price store.
///
/// Observations arrive in no guaranteed order and may share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub price: f64,
}

impl RawObservation {
    pub fn new(timestamp: i64, price: f64) -> Self {
        RawObservation { timestamp, price }
    }
}
