use async_trait::async_trait;

use crate::errors::CoreError;

/// Source of current unit prices.
///
/// The snapshot builder and the what-if helper only see this trait, so a
/// broken scraper can be swapped out without touching the ledger code.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current price of an asset in USD.
    ///
    /// An `Err` means "unavailable"; callers decide whether that is fatal.
    async fn get_current_price(&self, asset_id: &str) -> Result<f64, CoreError>;
}
