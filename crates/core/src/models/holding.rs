use serde::{Deserialize, Serialize};

/// A tracked asset and how much of it is held.
///
/// `asset_id` is the price source's identifier for the asset (e.g. "bitcoin",
/// "solana"). It doubles as the ledger column name, so it is kept verbatim
/// rather than upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_id: String,
    pub quantity: f64,
}

impl Holding {
    pub fn new(asset_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            quantity,
        }
    }
}

/// Asset ids of `holdings`, in configuration order.
pub fn asset_ids(holdings: &[Holding]) -> Vec<String> {
    holdings.iter().map(|h| h.asset_id.clone()).collect()
}
