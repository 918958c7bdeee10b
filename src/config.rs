/// Pipeline constants for the robust volatility calculation.
///
/// Defaults match the reference calculation; every value can be overridden
/// from the environment with range validation.
#[derive(Debug, Clone)]
pub struct VolatilityConfig {
    /// Decay span (days) of the exponentially weighted standard deviation.
    pub span: usize,
    /// Non-missing observations required before the EW std is emitted.
    pub min_periods: usize,
    /// Absolute lower bound applied to every volatility value.
    pub vol_abs_min: f64,
    /// Quantile used for the rolling volatility floor.
    pub floor_min_quant: f64,
    /// Non-missing observations required in the floor window.
    pub floor_min_periods: usize,
    /// Trailing floor window width (days).
    pub floor_days: usize,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        VolatilityConfig {
            span: 35,
            min_periods: 10,
            vol_abs_min: 1e-10,
            floor_min_quant: 0.05,
            floor_min_periods: 100,
            floor_days: 500,
        }
    }
}

impl VolatilityConfig {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or out of range.
    pub fn from_env() -> VolatilityConfig {
        let mut config = VolatilityConfig::default();

        if let Ok(span) = std::env::var("VOL_SPAN") {
            match span.parse::<usize>() {
                Ok(value) if value >= 2 => config.span = value,
                Ok(value) => {
                    tracing::warn!(
                        "Invalid VOL_SPAN value: {} (must be >= 2), using default: {}",
                        value,
                        config.span
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse VOL_SPAN '{}': {}, using default: {}",
                        span,
                        e,
                        config.span
                    );
                }
            }
        }

        if let Ok(min_periods) = std::env::var("VOL_MIN_PERIODS") {
            if let Ok(value) = min_periods.parse::<usize>() {
                if value >= 1 {
                    config.min_periods = value;
                }
            }
        }

        if let Ok(abs_min) = std::env::var("VOL_ABS_MIN") {
            if let Ok(value) = abs_min.parse::<f64>() {
                if value > 0.0 && value.is_finite() {
                    config.vol_abs_min = value;
                }
            }
        }

        if let Ok(quant) = std::env::var("VOL_FLOOR_MIN_QUANT") {
            if let Ok(value) = quant.parse::<f64>() {
                if (0.0..=1.0).contains(&value) {
                    config.floor_min_quant = value;
                }
            }
        }

        if let Ok(floor_min) = std::env::var("VOL_FLOOR_MIN_PERIODS") {
            if let Ok(value) = floor_min.parse::<usize>() {
                if value >= 1 {
                    config.floor_min_periods = value;
                }
            }
        }

        if let Ok(floor_days) = std::env::var("VOL_FLOOR_DAYS") {
            if let Ok(value) = floor_days.parse::<usize>() {
                if value >= 1 {
                    config.floor_days = value;
                }
            }
        }

        config
    }
}

/// Location of the historical price store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            base_url: "http://localhost:8000".to_string(),
            table: "multiple_prices".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> StoreConfig {
        let mut config = StoreConfig::default();

        if let Ok(url) = std::env::var("PRICE_STORE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(table) = std::env::var("PRICE_STORE_TABLE") {
            if !table.trim().is_empty() {
                config.table = table;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_volatility_config() {
        let config = VolatilityConfig::default();
        assert_eq!(config.span, 35);
        assert_eq!(config.min_periods, 10);
        assert_eq!(config.vol_abs_min, 1e-10);
        assert_eq!(config.floor_min_quant, 0.05);
        assert_eq!(config.floor_min_periods, 100);
        assert_eq!(config.floor_days, 500);
    }

    #[test]
    fn test_default_store_config() {
        let config = StoreConfig::default();
        assert_eq!(config.table, "multiple_prices");
        assert!(config.base_url.starts_with("http"));
    }
}
