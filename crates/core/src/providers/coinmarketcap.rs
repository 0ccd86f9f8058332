use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::settings::PriceSourceSettings;
use super::traits::PriceProvider;

const PROVIDER_NAME: &str = "CoinMarketCap";

/// Scrapes the current price from a CoinMarketCap-style currency page.
///
/// - **Free**: no API key, plain HTML page per asset.
/// - **Fragile**: the price is located by CSS class, which changes whenever the
///   site's front end is rebuilt. Selectors are configurable for that reason.
///
/// Asset ids are the page slugs ("bitcoin", "solana", "xrp").
pub struct CoinMarketCapProvider {
    client: Client,
    base_url: String,
    selectors: Vec<Selector>,
}

impl CoinMarketCapProvider {
    pub fn new(settings: &PriceSourceSettings) -> Result<Self, CoreError> {
        let selectors = parse_selectors(&settings.price_selectors)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            selectors,
        })
    }

    /// Page URL for an asset id.
    pub fn page_url(&self, asset_id: &str) -> String {
        format!("{}/{}/", self.base_url, asset_id)
    }
}

/// Compile CSS selector strings, rejecting any that do not parse.
pub fn parse_selectors(raw: &[String]) -> Result<Vec<Selector>, CoreError> {
    raw.iter()
        .map(|s| {
            Selector::parse(s)
                .map_err(|e| CoreError::Config(format!("Invalid price selector '{s}': {e}")))
        })
        .collect()
}

/// Pull a unit price out of a page's HTML.
///
/// Selectors are tried in order; the first matching element wins. `$`, `,`
/// and whitespace are stripped from its text before parsing.
pub fn extract_price(html: &str, selectors: &[Selector], asset_id: &str) -> Result<f64, CoreError> {
    let document = Html::parse_document(html);

    let text = selectors
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| CoreError::PriceParse {
            asset: asset_id.to_string(),
            message: "no element matched the configured price selectors".into(),
        })?;

    let cleaned: String = text
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    let price: f64 = cleaned.parse().map_err(|e| CoreError::PriceParse {
        asset: asset_id.to_string(),
        message: format!("'{}' is not a number: {e}", text.trim()),
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::PriceParse {
            asset: asset_id.to_string(),
            message: format!("price {price} must be finite and non-negative"),
        });
    }

    Ok(price)
}

#[async_trait]
impl PriceProvider for CoinMarketCapProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, asset_id: &str) -> Result<f64, CoreError> {
        let url = self.page_url(asset_id);
        debug!(%url, "fetching price page");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} for {asset_id}"),
            });
        }

        let body = resp.text().await?;
        extract_price(&body, &self.selectors, asset_id)
    }
}
