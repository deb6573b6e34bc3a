//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the market simulator.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::{SessionFrame, SimulationSession};
use crate::adapters::persistence::FileSeedStore;
use crate::config::load_config;
use crate::ports::{source_from_seed, InMemorySeedStore, SeedStore};
use crate::simulation::{stats_projector, CandleGenerator, SimulationConfig};

/// Market Sim - Synthetic token market simulator
#[derive(Parser, Debug)]
#[command(
    name = "market-sim",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Synthetic token market simulator",
    long_about = "Market Sim animates a synthetic token chart and dashboard statistics \
                  under drift, pump, liquidity-withdrawal and operator-override regimes."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a live simulation session
    Run(RunCmd),

    /// Print a freshly generated candle history
    History(HistoryCmd),

    /// Print the statistics projected from a liquidity seed
    Project(ProjectCmd),
}

/// Run a live session
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/market-sim.toml")]
    pub config: PathBuf,

    /// Start in the independent pump regime
    #[arg(long)]
    pub pump: bool,

    /// Withdraw liquidity after this many seconds
    #[arg(long, value_name = "SECS")]
    pub withdraw_after: Option<u64>,

    /// Force the statistics override after this many seconds
    #[arg(long, value_name = "SECS")]
    pub override_after: Option<u64>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Override the RNG seed from the config
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Print every frame as a JSON line
    #[arg(long)]
    pub json: bool,
}

/// Generate a candle history
#[derive(Parser, Debug)]
pub struct HistoryCmd {
    /// Seed price
    #[arg(long, value_name = "PRICE")]
    pub price: f64,

    /// RNG seed for a reproducible history
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Project statistics from liquidity
#[derive(Parser, Debug)]
pub struct ProjectCmd {
    /// Liquidity seed
    #[arg(long, value_name = "AMOUNT")]
    pub liquidity: f64,

    /// RNG seed for a reproducible projection
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Run(cmd) => run_command(cmd, app.verbose, app.debug).await,
        Command::History(cmd) => {
            init_logging(app.verbose, app.debug, "warn")?;
            history_command(cmd)
        }
        Command::Project(cmd) => {
            init_logging(app.verbose, app.debug, "warn")?;
            project_command(cmd)
        }
    }
}

/// Initialize logging system
///
/// `--debug` and `--verbose` win over `RUST_LOG`, which wins over `default_level`.
fn init_logging(verbose: bool, debug: bool, default_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Handle run command
async fn run_command(cmd: RunCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load_config(&cmd.config)
        .with_context(|| format!("Failed to load configuration from {}", cmd.config.display()))?;
    init_logging(verbose, debug, &config.logging.level)?;

    let mut sim_config = SimulationConfig::from(&config);
    if cmd.pump {
        sim_config.chart_independent = true;
    }
    if let Some(seed) = cmd.seed {
        sim_config.rng_seed = Some(seed);
    }

    let store: Arc<dyn SeedStore> = match config.persistence.get_seed_file() {
        Some(path) => {
            tracing::info!("Seed file: {}", path.display());
            Arc::new(FileSeedStore::new(path))
        }
        None => Arc::new(InMemorySeedStore::new()),
    };

    let session = Arc::new(SimulationSession::new(sim_config, store));
    let first = session.start().await.context("Failed to start simulation session")?;
    print_frame(&first, cmd.json)?;

    let mut frames = session.subscribe();
    let json = cmd.json;
    let printer = tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            if let Err(e) = print_frame(&frame, json) {
                tracing::warn!("Failed to print frame: {}", e);
            }
        }
    });

    if let Some(secs) = cmd.withdraw_after {
        let session = session.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            if let Err(e) = session.withdraw_liquidity().await {
                tracing::warn!("Withdrawal ignored: {}", e);
            }
        });
    }

    if let Some(secs) = cmd.override_after {
        let session = session.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            if let Err(e) = session.force_override().await {
                tracing::warn!("Override ignored: {}", e);
            }
        });
    }

    match cmd.duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    tracing::info!("Run duration elapsed");
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        }
    }

    session.stop().await;
    printer.abort();
    Ok(())
}

/// Handle history command
fn history_command(cmd: HistoryCmd) -> Result<()> {
    let mut rng = source_from_seed(cmd.seed);
    let candles = CandleGenerator::default().initialize(cmd.price, Utc::now(), &mut rng);
    if candles.is_empty() {
        tracing::warn!("Seed price {} is not positive - empty history", cmd.price);
    }
    println!("{}", serde_json::to_string_pretty(&candles)?);
    Ok(())
}

/// Handle project command
fn project_command(cmd: ProjectCmd) -> Result<()> {
    let mut rng = source_from_seed(cmd.seed);
    let stats = stats_projector::seed(cmd.liquidity, &mut rng);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn print_frame(frame: &SessionFrame, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(frame)?);
        return Ok(());
    }

    let close = frame
        .candles
        .last()
        .map(|c| format!("{:.10}", c.close))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "[{:?}] close {} | price {:.10} | mcap {:.2} | liq {:.2} | vol {:.2} | holders {}",
        frame.mode,
        close,
        frame.stats.price,
        frame.stats.market_cap,
        frame.stats.liquidity,
        frame.stats.volume,
        frame.stats.holders
    );
    Ok(())
}
