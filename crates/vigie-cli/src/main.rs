use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use vigie_client::ChromiumSession;
use vigie_core::runner::{CheckRunner, ConsoleReporter, RunConfig};
use vigie_core::scenario::Scenario;
use vigie_core::scenarios;

#[derive(Parser)]
#[command(name = "vigie", version, about = "Headless-browser smoke checks for the tiles frontend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Base URL of the frontend under verification
    #[arg(long, env = "VIGIE_BASE_URL", default_value = "http://localhost:3000")]
    base_url: Url,

    /// Directory screenshots are written to
    #[arg(long, env = "VIGIE_OUT_DIR", default_value = "verification")]
    out_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the home page map and the admin login form
    Frontend(RunArgs),

    /// Visual pass over recent changes: header, tour button, admin, 404 page
    Changes(RunArgs),

    /// Verify the tile grid and the tile-detail modal
    Tiles(RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (args, scenario) = match cli.command {
        Commands::Frontend(args) => (args, scenarios::frontend()),
        Commands::Changes(args) => (args, scenarios::changes()),
        Commands::Tiles(args) => (args, scenarios::tiles()),
    };

    run_scenario(args, scenario).await
}

async fn run_scenario(args: RunArgs, scenario: Scenario) -> Result<()> {
    tracing::info!(scenario = %scenario.name, base_url = %args.base_url, "Launching headless browser");

    let session = ChromiumSession::launch()
        .await
        .context("Failed to launch headless browser")?;

    let runner = CheckRunner::new(session, RunConfig::new(args.base_url, args.out_dir));
    let outcome = runner.run(&scenario, &ConsoleReporter).await;

    // A failed step has already been printed as an `Error:` line; the
    // screenshots and console output are the verification signal, so the
    // process still exits 0 either way.
    if let Some(error) = &outcome.error {
        tracing::debug!(%error, "Scenario did not complete");
    } else {
        tracing::info!(
            screenshots = outcome.screenshots.len(),
            "Scenario completed"
        );
    }

    Ok(())
}
