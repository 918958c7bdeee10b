pub mod memory_store;
pub mod price_store;
