use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::observation::RawObservation;
use crate::domain::errors::StoreError;

/// Read access to the historical price store.
///
/// Injected into the request pipeline so tests can substitute an in-memory
/// fake for the real store.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// All observations for `instrument` with timestamps in
    /// `[start_time, end_time]`, transparently following pagination until
    /// exhausted. Returns an empty vector when nothing matches; never
    /// returns a partial result.
    async fn fetch_prices(
        &self,
        instrument: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<RawObservation>, StoreError>;
}

/// One key-range query against the store. Only `timestamp` and `price` are
/// requested per item.
#[derive(Debug, Serialize)]
struct RangeQuery<'a> {
    table: &'a str,
    instrument: &'a str,
    start_time: i64,
    end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclusive_start_key: Option<String>,
}

/// One page of query results. `last_evaluated_key` present means more pages
/// follow.
#[derive(Debug, Deserialize)]
struct PricePage {
    items: Vec<RawObservation>,
    #[serde(default)]
    last_evaluated_key: Option<String>,
}

/// HTTP client for the price store's paginated query endpoint.
pub struct HttpPriceStore {
    client: Client,
    base_url: String,
    table: String,
}

impl HttpPriceStore {
    pub fn new(base_url: String, table: String) -> Self {
        HttpPriceStore {
            client: Client::new(),
            base_url,
            table,
        }
    }

    async fn query_page(&self, query: &RangeQuery<'_>) -> Result<PricePage, StoreError> {
        let url = format!("{}/query", self.base_url);
        let response = self.client.post(&url).json(query).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        response
            .json::<PricePage>()
            .await
            .map_err(|e| StoreError::MalformedPage(e.to_string()))
    }
}

#[async_trait]
impl PriceStore for HttpPriceStore {
    async fn fetch_prices(
        &self,
        instrument: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<RawObservation>, StoreError> {
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<String> = None;
        loop {
            let page = self
                .query_page(&RangeQuery {
                    table: &self.table,
                    instrument,
                    start_time,
                    end_time,
                    exclusive_start_key: exclusive_start_key.take(),
                })
                .await?;
            items.extend(page.items);
            match page.last_evaluated_key {
                Some(key) => {
                    debug!(instrument, accumulated = items.len(), "following store pagination");
                    exclusive_start_key = Some(key);
                }
                None => break,
            }
        }
        Ok(items)
    }
}
