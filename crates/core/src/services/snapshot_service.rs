use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::holding::Holding;
use crate::models::snapshot::{BuildOutcome, ChangeEvent, ChangeKind, Snapshot};
use crate::providers::traits::PriceProvider;

/// Builds one snapshot from the configured holdings and freshly fetched prices.
///
/// A failed fetch never aborts the build: the asset is valued at 0 and listed
/// in `BuildOutcome::unavailable`.
pub struct SnapshotService {
    holdings: Vec<Holding>,
}

impl SnapshotService {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Fetch a price per holding (sequentially, in configuration order) and
    /// value the portfolio at `timestamp`.
    ///
    /// `last_quantities` are the quantities from the ledger's last row; a
    /// missing entry counts as 0.
    pub async fn build(
        &self,
        provider: &dyn PriceProvider,
        last_quantities: &HashMap<String, f64>,
        timestamp: NaiveDateTime,
    ) -> BuildOutcome {
        let mut values = HashMap::with_capacity(self.holdings.len());
        let mut quantities = HashMap::with_capacity(self.holdings.len());
        let mut prices = HashMap::with_capacity(self.holdings.len());
        let mut changes = Vec::with_capacity(self.holdings.len());
        let mut unavailable = Vec::new();

        for holding in &self.holdings {
            let asset_id = holding.asset_id.as_str();

            let price = match provider.get_current_price(asset_id).await {
                Ok(price) => {
                    prices.insert(asset_id.to_string(), price);
                    price
                }
                Err(e) => {
                    warn!(asset = asset_id, provider = provider.name(), error = %e, "price unavailable, valuing at 0");
                    unavailable.push(asset_id.to_string());
                    0.0
                }
            };

            values.insert(asset_id.to_string(), price * holding.quantity);
            quantities.insert(asset_id.to_string(), holding.quantity);

            let previous = last_quantities.get(asset_id).copied().unwrap_or(0.0);
            let change = ChangeEvent::classify(asset_id, previous, holding.quantity);
            log_change(&change);
            changes.push(change);
        }

        // Sum in configuration order so the total is reproducible.
        let total_value = self
            .holdings
            .iter()
            .map(|h| values.get(&h.asset_id).copied().unwrap_or(0.0))
            .sum();

        BuildOutcome {
            snapshot: Snapshot {
                timestamp,
                total_value,
                values,
                quantities,
            },
            changes,
            prices,
            unavailable,
        }
    }
}

fn log_change(change: &ChangeEvent) {
    match change.kind {
        ChangeKind::Added => info!(
            asset = %change.asset_id,
            "No previous quantity recorded for {}. Added with quantity {}",
            change.asset_id,
            change.current
        ),
        ChangeKind::Changed => info!(
            asset = %change.asset_id,
            "Quantity change for {}: was {}, now {}",
            change.asset_id,
            change.previous,
            change.current
        ),
        ChangeKind::Unchanged => {}
    }
}
