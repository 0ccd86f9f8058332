use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// How the operator supplies hypothetical prices. Chosen once for the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProspectiveMode {
    /// Input is the prospective unit price itself
    AbsoluteValue,
    /// Input multiplies the current unit price
    Multiplier,
}

impl std::fmt::Display for ProspectiveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProspectiveMode::AbsoluteValue => write!(f, "value"),
            ProspectiveMode::Multiplier => write!(f, "multiplier"),
        }
    }
}

impl FromStr for ProspectiveMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "value" => Ok(ProspectiveMode::AbsoluteValue),
            "multiplier" => Ok(ProspectiveMode::Multiplier),
            other => Err(CoreError::InvalidInput {
                asset: "mode".into(),
                message: format!("expected 'value' or 'multiplier', got '{other}'"),
            }),
        }
    }
}

/// Hypothetical valuation of one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProspectiveQuote {
    pub asset_id: String,
    pub quantity: f64,
    pub price: f64,
    pub value: f64,
}

/// Outcome of a what-if batch: computed quotes plus the assets that were skipped.
#[derive(Debug, Default)]
pub struct ProspectiveReport {
    pub quotes: Vec<ProspectiveQuote>,
    pub errors: Vec<CoreError>,
}

impl ProspectiveReport {
    pub fn total_value(&self) -> f64 {
        self.quotes.iter().map(|q| q.value).sum()
    }

    pub fn quote_for(&self, asset_id: &str) -> Option<&ProspectiveQuote> {
        self.quotes.iter().find(|q| q.asset_id == asset_id)
    }
}
