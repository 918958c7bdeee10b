pub mod volatility_handler;
