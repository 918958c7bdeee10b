use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::entities::observation::RawObservation;
use crate::domain::errors::StoreError;
use crate::infrastructure::price_store::PriceStore;

/// In-memory stand-in for the price store, for tests and local runs.
///
/// Serves seeded observations filtered to the requested window, and can be
/// armed to fail every query to exercise retrieval error paths.
#[derive(Default)]
pub struct InMemoryPriceStore {
    observations: Vec<(String, RawObservation)>,
    fail_queries: AtomicBool,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observations(instrument: &str, observations: Vec<RawObservation>) -> Self {
        let mut store = Self::new();
        for obs in observations {
            store.insert(instrument, obs);
        }
        store
    }

    pub fn insert(&mut self, instrument: &str, observation: RawObservation) {
        self.observations
            .push((instrument.to_string(), observation));
    }

    /// Make every subsequent query fail with a transport-style error.
    pub fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn fetch_prices(
        &self,
        instrument: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<RawObservation>, StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(StoreError::Request("simulated store outage".to_string()));
        }
        Ok(self
            .observations
            .iter()
            .filter(|(name, obs)| {
                name == instrument && (start_time..=end_time).contains(&obs.timestamp)
            })
            .map(|(_, obs)| *obs)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filters_by_instrument_and_window() {
        let mut store = InMemoryPriceStore::new();
        store.insert("GOLD", RawObservation::new(100, 1.0));
        store.insert("GOLD", RawObservation::new(200, 2.0));
        store.insert("GOLD", RawObservation::new(300, 3.0));
        store.insert("CRUDE_OIL", RawObservation::new(200, 9.0));

        let items = store.fetch_prices("GOLD", 150, 250).await.unwrap();
        assert_eq!(items, vec![RawObservation::new(200, 2.0)]);
    }

    #[tokio::test]
    async fn test_empty_result_for_unknown_instrument() {
        let store = InMemoryPriceStore::new();
        let items = store.fetch_prices("GOLD", 0, 1000).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_armed_store_fails() {
        let store = InMemoryPriceStore::new();
        store.fail_queries();
        let result = store.fetch_prices("GOLD", 0, 1000).await;
        assert!(matches!(result, Err(StoreError::Request(_))));
    }
}
