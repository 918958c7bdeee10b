use chrono::{DateTime, NaiveDate, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// A series indexed by UTC calendar day.
///
/// The index is contiguous: slot `i` holds the value for `first_day + i`
/// (days since the unix epoch). Days with no value hold `None`; a missing
/// day is never represented as zero. The same type carries prices,
/// volatilities and floor references through the pipeline, so every stage
/// preserves the index.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    first_day: i64,
    values: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn new(first_day: i64, values: Vec<Option<f64>>) -> Self {
        DailySeries { first_day, values }
    }

    pub fn empty() -> Self {
        DailySeries {
            first_day: 0,
            values: Vec::new(),
        }
    }

    /// Truncate a unix timestamp (seconds) to its UTC calendar day.
    pub fn epoch_day(timestamp: i64) -> i64 {
        timestamp.div_euclid(SECS_PER_DAY)
    }

    pub fn first_day(&self) -> i64 {
        self.first_day
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Epoch day covered by slot `index`.
    pub fn day_at(&self, index: usize) -> i64 {
        self.first_day + index as i64
    }

    /// Calendar date covered by slot `index`, if representable.
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp(self.day_at(index) * SECS_PER_DAY, 0)
            .map(|dt| dt.date_naive())
    }

    /// A new series on the same index with every present value transformed.
    pub fn map_values<F>(&self, f: F) -> DailySeries
    where
        F: Fn(f64) -> f64,
    {
        DailySeries {
            first_day: self.first_day,
            values: self.values.iter().map(|v| v.map(&f)).collect(),
        }
    }
}
