pub mod daily_aggregator;
pub mod ew_volatility;
pub mod vol_floor;
