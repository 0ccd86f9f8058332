pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use tracing::warn;

use errors::CoreError;
use models::{
    chart::ChartDataPoint,
    holding::{asset_ids, Holding},
    prospective::{ProspectiveMode, ProspectiveReport},
    settings::Settings,
    snapshot::BuildOutcome,
};
use providers::coinmarketcap::CoinMarketCapProvider;
use providers::traits::PriceProvider;
use services::{
    annotation_service::AnnotationService, prospective_service::ProspectiveService,
    snapshot_service::SnapshotService,
};
use storage::ledger::Ledger;

/// Main entry point for the Value Tracker core library.
/// Holds the configuration, the price source and all services needed for a run.
#[must_use]
pub struct ValueTracker {
    settings: Settings,
    provider: Box<dyn PriceProvider>,
    snapshot_service: SnapshotService,
    annotation_service: AnnotationService,
    prospective_service: ProspectiveService,
}

impl std::fmt::Debug for ValueTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTracker")
            .field("ledger_path", &self.settings.ledger_path)
            .field("holdings", &self.settings.holdings.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl ValueTracker {
    /// Create a tracker with an explicit price source (tests, alternative scrapers).
    pub fn new(settings: Settings, provider: Box<dyn PriceProvider>) -> Result<Self, CoreError> {
        settings.validate()?;
        let snapshot_service = SnapshotService::new(settings.holdings.clone());
        Ok(Self {
            settings,
            provider,
            snapshot_service,
            annotation_service: AnnotationService::new(),
            prospective_service: ProspectiveService::new(),
        })
    }

    /// Create a tracker that scrapes prices from the configured price page.
    pub fn with_default_provider(settings: Settings) -> Result<Self, CoreError> {
        let provider = CoinMarketCapProvider::new(&settings.price_source)?;
        Self::new(settings, Box::new(provider))
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.settings.holdings
    }

    /// Open (or create) the configured ledger, validated against the holdings.
    pub fn open_ledger(&self) -> Result<Ledger, CoreError> {
        Ledger::open_or_create(&self.settings.ledger_path, &asset_ids(self.holdings()))
    }

    // ── Recording ───────────────────────────────────────────────────

    /// Fetch prices, value the holdings now and append the snapshot.
    pub async fn record_snapshot(&self) -> Result<BuildOutcome, CoreError> {
        self.record_snapshot_at(Local::now().naive_local()).await
    }

    /// Same as `record_snapshot` with an explicit timestamp.
    pub async fn record_snapshot_at(&self, timestamp: NaiveDateTime) -> Result<BuildOutcome, CoreError> {
        let ledger = self.open_ledger()?;
        let last_quantities = ledger.last_quantities()?;

        let outcome = self
            .snapshot_service
            .build(self.provider.as_ref(), &last_quantities, timestamp)
            .await;

        ledger.append(&outcome.snapshot)?;
        Ok(outcome)
    }

    // ── History ─────────────────────────────────────────────────────

    /// Annotated history of the configured ledger.
    pub fn history(&self) -> Result<Vec<ChartDataPoint>, CoreError> {
        let ledger = self.open_ledger()?;
        let rows = ledger.read_all()?;
        Ok(self
            .annotation_service
            .chart_points(&rows, ledger.schema().asset_ids()))
    }

    /// Annotated history of any ledger file, even one written for a different
    /// asset set. Configured assets the file lacks are skipped.
    pub fn history_from(&self, path: &str) -> Result<Vec<ChartDataPoint>, CoreError> {
        let ledger = Ledger::open_existing(path)?;
        let rows = ledger.read_all()?;
        Ok(self
            .annotation_service
            .chart_points(&rows, &asset_ids(self.holdings())))
    }

    // ── Prospective pricing ─────────────────────────────────────────

    /// Current price per holding, `None` where the fetch failed.
    pub async fn current_prices(&self) -> HashMap<String, Option<f64>> {
        let mut prices = HashMap::with_capacity(self.holdings().len());
        for holding in self.holdings() {
            let price = match self.provider.get_current_price(&holding.asset_id).await {
                Ok(price) => Some(price),
                Err(e) => {
                    warn!(asset = %holding.asset_id, error = %e, "current price unavailable, using 0");
                    None
                }
            };
            prices.insert(holding.asset_id.clone(), price);
        }
        prices
    }

    /// What-if valuation of the holdings. Never touches the ledger.
    #[must_use]
    pub fn prospective(
        &self,
        mode: ProspectiveMode,
        inputs: &HashMap<String, String>,
        current_prices: &HashMap<String, Option<f64>>,
    ) -> ProspectiveReport {
        self.prospective_service
            .evaluate(mode, self.holdings(), inputs, current_prices)
    }
}
