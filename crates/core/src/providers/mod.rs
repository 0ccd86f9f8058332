pub mod traits;

// Price source implementations
pub mod coinmarketcap;
