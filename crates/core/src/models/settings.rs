use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::CoreError;

use super::holding::Holding;

/// User-configurable settings, loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path of the CSV ledger file
    pub ledger_path: String,

    /// Tracked holdings. Their order is the ledger's column order.
    pub holdings: Vec<Holding>,

    /// Where and how prices are scraped
    pub price_source: PriceSourceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_path: "ValueGraph.csv".to_string(),
            holdings: vec![
                Holding::new("cardano", 20000.0),
                Holding::new("bitcoin", 1.0),
                Holding::new("solana", 200.0),
                Holding::new("xrp", 6073.456088),
            ],
            price_source: PriceSourceSettings::default(),
        }
    }
}

/// Settings for the scraped price page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSourceSettings {
    /// The asset page is `{base_url}/{asset_id}/`
    pub base_url: String,

    /// CSS selectors tried in order; the first match holds the price text
    pub price_selectors: Vec<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for PriceSourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://coinmarketcap.com/currencies".to_string(),
            price_selectors: vec![
                "span.sc-d1ede7e3-0.hSTakI.base-text".to_string(),
                "span.sc-d1ede7e3-0.fsQm.base-text".to_string(),
            ],
            timeout_secs: 30,
            user_agent: concat!("value-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Check the invariants the ledger and snapshot builder rely on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ledger_path.trim().is_empty() {
            return Err(CoreError::Config("ledger_path must not be empty".into()));
        }
        if self.holdings.is_empty() {
            return Err(CoreError::Config("at least one holding is required".into()));
        }

        let mut seen = HashSet::new();
        for holding in &self.holdings {
            if holding.asset_id.trim().is_empty() {
                return Err(CoreError::Config("asset_id must not be empty".into()));
            }
            if !seen.insert(holding.asset_id.as_str()) {
                return Err(CoreError::Config(format!(
                    "duplicate asset_id '{}'",
                    holding.asset_id
                )));
            }
            if !holding.quantity.is_finite() || holding.quantity < 0.0 {
                return Err(CoreError::Config(format!(
                    "quantity for '{}' must be finite and non-negative, got {}",
                    holding.asset_id, holding.quantity
                )));
            }
        }

        if self.price_source.price_selectors.is_empty() {
            return Err(CoreError::Config(
                "price_source.price_selectors must not be empty".into(),
            ));
        }
        if self.price_source.timeout_secs == 0 {
            return Err(CoreError::Config(
                "price_source.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
