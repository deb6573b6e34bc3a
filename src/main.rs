//! Market Sim - Synthetic Token Market Simulator
//!
//! Runs a live simulation session or prints one-off generator output.

use anyhow::Result;

use market_sim::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (MARKET_SIM_SEED_FILE, RUST_LOG)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
