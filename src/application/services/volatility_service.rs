use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::VolatilityConfig;
use crate::domain::entities::observation::RawObservation;
use crate::domain::entities::series::DailySeries;
use crate::domain::errors::StoreError;
use crate::domain::services::daily_aggregator::aggregate_to_daily;
use crate::domain::services::ew_volatility::EwVolatility;
use crate::domain::services::vol_floor::{apply_min_vol, QuantileFloor};
use crate::infrastructure::price_store::PriceStore;

/// The four-stage pipeline on already-fetched observations: daily
/// aggregation, EW volatility, absolute minimum clamp, rolling-quantile
/// floor. Deterministic and allocation-fresh; no wall-clock dependency.
pub fn compute_robust_volatility(
    observations: &[RawObservation],
    config: &VolatilityConfig,
) -> DailySeries {
    let prices = aggregate_to_daily(observations);
    let vol = EwVolatility::new(config.span, config.min_periods).estimate(&prices);
    let cut_vol = apply_min_vol(&vol, config.vol_abs_min);
    QuantileFloor::new(
        config.floor_min_quant,
        config.floor_min_periods,
        config.floor_days,
    )
    .apply(&cut_vol)
}

/// Per-request orchestration: fetch all price pages for the window, then run
/// the numeric pipeline.
pub struct VolatilityService {
    store: Arc<dyn PriceStore>,
    config: VolatilityConfig,
}

impl VolatilityService {
    pub fn new(store: Arc<dyn PriceStore>, config: VolatilityConfig) -> Self {
        VolatilityService { store, config }
    }

    /// Compute the floored volatility series for `instrument` from
    /// `start_time` to now. The HTTP contract currently discards the series;
    /// it is returned here so callers and tests can inspect it.
    pub async fn robust_volatility(
        &self,
        instrument: &str,
        start_time: i64,
    ) -> Result<DailySeries, StoreError> {
        let end_time = Utc::now().timestamp();
        let observations = self
            .store
            .fetch_prices(instrument, start_time, end_time)
            .await?;
        debug!(
            instrument,
            observations = observations.len(),
            "retrieved price observations"
        );
        Ok(compute_robust_volatility(&observations, &self.config))
    }
}
