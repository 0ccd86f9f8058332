mod prompt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use value_tracker_core::models::chart::{ChartDataPoint, ChartOptions};
use value_tracker_core::models::prospective::ProspectiveMode;
use value_tracker_core::models::settings::Settings;
use value_tracker_core::models::snapshot::BuildOutcome;
use value_tracker_core::services::chart_service::ChartService;
use value_tracker_core::ValueTracker;

const DEFAULT_CHART_FILE: &str = "value-tracker-chart.html";

#[derive(Parser, Debug)]
#[command(version, about = "Track the value of crypto holdings over time")]
struct Args {
    /// JSON settings file; built-in defaults are used when it does not exist
    #[arg(long, env = "VALUE_TRACKER_CONFIG", default_value = "value-tracker.json")]
    config: PathBuf,

    /// Override the ledger path from the settings file
    #[arg(long)]
    ledger: Option<String>,

    /// Where to write the chart (defaults to the system temp directory)
    #[arg(long)]
    chart_out: Option<PathBuf>,

    /// Do not ask about prospective prices after recording
    #[arg(long, global = true)]
    no_prompt: bool,

    /// Run the what-if step in this mode (value|multiplier) without asking
    #[arg(long, global = true)]
    what_if_mode: Option<String>,

    /// Record without writing the chart
    #[arg(long, global = true)]
    no_chart: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch prices, append a snapshot and chart the history (default)
    Record,
    /// Chart an existing ledger without fetching prices
    Chart,
    /// Only run the prospective pricing prompts
    WhatIf {
        /// value|multiplier; asked interactively when omitted
        #[arg(long)]
        mode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("{}=info,value_tracker_core=info", env!("CARGO_CRATE_NAME")).into()
        }))
        .with(fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(ledger) = &args.ledger {
        settings.ledger_path = ledger.clone();
    }

    let tracker = ValueTracker::with_default_provider(settings)?;
    let chart_out = args
        .chart_out
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_CHART_FILE));

    match args.command.unwrap_or(Commands::Record) {
        Commands::Record => {
            let outcome = tracker
                .record_snapshot()
                .await
                .context("failed to record snapshot")?;
            print_outcome(&tracker, &outcome);

            if args.what_if_mode.is_some() {
                run_what_if(&tracker, args.what_if_mode).await?;
            } else if !args.no_prompt
                && prompt::confirm("Do you want to enter prospective prices for your tokens? (yes/no): ")?
            {
                run_what_if(&tracker, None).await?;
            }

            if !args.no_chart {
                let points = tracker.history().context("failed to read ledger history")?;
                write_chart(&points, &chart_out)?;
            }
        }
        Commands::Chart => {
            let points = tracker
                .history_from(&tracker.settings().ledger_path)
                .context("failed to read ledger history")?;
            write_chart(&points, &chart_out)?;
        }
        Commands::WhatIf { mode } => run_what_if(&tracker, mode.or(args.what_if_mode)).await?,
    }

    Ok(())
}

fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        info!(config = %path.display(), "no settings file, using built-in defaults");
        return Ok(Settings::default());
    }
    Settings::load_from_file(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))
}

fn print_outcome(tracker: &ValueTracker, outcome: &BuildOutcome) {
    let snapshot = &outcome.snapshot;
    println!("Snapshot at {}", snapshot.formatted_timestamp());
    for holding in tracker.holdings() {
        let id = &holding.asset_id;
        let value = snapshot.values.get(id).copied().unwrap_or(0.0);
        match outcome.prices.get(id) {
            Some(price) => println!("  {id}: {} x ${price} = ${value:.2}", holding.quantity),
            None => println!("  {id}: {} x (price unavailable) = ${value:.2}", holding.quantity),
        }
    }
    println!("Total value: ${:.2}", snapshot.total_value);
}

async fn run_what_if(tracker: &ValueTracker, mode: Option<String>) -> Result<()> {
    let raw_mode = match mode {
        Some(mode) => mode,
        None => prompt::ask(
            "Do you want to enter a specific value or a multiplier for each token? (value/multiplier): ",
        )?,
    };
    let mode: ProspectiveMode = match raw_mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            warn!(error = %e, "skipping prospective prices");
            return Ok(());
        }
    };

    let current_prices = match mode {
        ProspectiveMode::Multiplier => tracker.current_prices().await,
        ProspectiveMode::AbsoluteValue => HashMap::new(),
    };

    let mut inputs = HashMap::with_capacity(tracker.holdings().len());
    for holding in tracker.holdings() {
        let question = match mode {
            ProspectiveMode::AbsoluteValue => format!("Enter prospective price for {}: ", holding.asset_id),
            ProspectiveMode::Multiplier => format!("Enter multiplier for {}: ", holding.asset_id),
        };
        inputs.insert(holding.asset_id.clone(), prompt::ask(&question)?);
    }

    let report = tracker.prospective(mode, &inputs, &current_prices);
    for quote in &report.quotes {
        println!(
            "Prospective value of {} at {}: ${:.2}",
            quote.asset_id, quote.price, quote.value
        );
    }
    for error in &report.errors {
        warn!(error = %error, "skipping asset");
    }
    println!("Prospective total value: ${:.2}", report.total_value());
    Ok(())
}

fn write_chart(points: &[ChartDataPoint], path: &Path) -> Result<()> {
    ChartService::new()
        .write_html(points, &ChartOptions::default(), path)
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    println!("Chart written to {}", path.display());
    Ok(())
}
