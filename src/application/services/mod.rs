pub mod volatility_service;
