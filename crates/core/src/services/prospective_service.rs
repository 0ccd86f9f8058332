use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::prospective::{ProspectiveMode, ProspectiveQuote, ProspectiveReport};

/// What-if valuation of the holdings at hypothetical prices.
///
/// Pure business logic, never touches the ledger. Prompting and price fetching
/// happen in the caller.
pub struct ProspectiveService;

impl ProspectiveService {
    pub fn new() -> Self {
        Self
    }

    /// Value every holding under `mode`.
    ///
    /// - `inputs`: asset_id → raw operator text (a price or a multiplier).
    /// - `current_prices`: asset_id → current price, `None` when unavailable.
    ///   Only read in `Multiplier` mode; an unavailable price counts as 0.
    ///
    /// Unparseable or missing input skips that asset with an `InvalidInput`
    /// error in the report; the other assets are still valued.
    pub fn evaluate(
        &self,
        mode: ProspectiveMode,
        holdings: &[Holding],
        inputs: &HashMap<String, String>,
        current_prices: &HashMap<String, Option<f64>>,
    ) -> ProspectiveReport {
        let mut report = ProspectiveReport::default();

        for holding in holdings {
            match self.quote(mode, holding, inputs, current_prices) {
                Ok(quote) => report.quotes.push(quote),
                Err(e) => report.errors.push(e),
            }
        }

        report
    }

    fn quote(
        &self,
        mode: ProspectiveMode,
        holding: &Holding,
        inputs: &HashMap<String, String>,
        current_prices: &HashMap<String, Option<f64>>,
    ) -> Result<ProspectiveQuote, CoreError> {
        let asset_id = holding.asset_id.as_str();
        let raw = inputs.get(asset_id).ok_or_else(|| CoreError::InvalidInput {
            asset: asset_id.to_string(),
            message: "no input given".into(),
        })?;
        let number = parse_number(asset_id, raw)?;

        let price = match mode {
            ProspectiveMode::AbsoluteValue => number,
            ProspectiveMode::Multiplier => {
                let current = current_prices.get(asset_id).copied().flatten().unwrap_or(0.0);
                current * number
            }
        };

        Ok(ProspectiveQuote {
            asset_id: asset_id.to_string(),
            quantity: holding.quantity,
            price,
            value: price * holding.quantity,
        })
    }
}

impl Default for ProspectiveService {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_number(asset_id: &str, raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let number: f64 = trimmed.parse().map_err(|_| CoreError::InvalidInput {
        asset: asset_id.to_string(),
        message: format!("'{trimmed}' is not a number"),
    })?;
    if !number.is_finite() {
        return Err(CoreError::InvalidInput {
            asset: asset_id.to_string(),
            message: format!("'{trimmed}' is not a finite number"),
        });
    }
    Ok(number)
}
