//! ftxcmd - interactive order command line - Entry Point

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;

use ftxcmd_cli::{AppConfig, Application, SessionOverrides};

/// Type orders instead of clicking them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via FTXCMD_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Market to select at startup (e.g. XTZ-PERP)
    #[arg(short, long)]
    market: Option<String>,

    /// Fat-finger ceiling at startup
    #[arg(short, long)]
    fatfinger: Option<Decimal>,

    /// Run one command line and exit instead of starting the prompt
    #[arg(long)]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    ftxcmd_telemetry::init_logging(None)?;

    info!("Starting ftxcmd v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(args.config)?;
    info!(endpoint = %config.exchange.endpoint, "Configuration loaded");

    let overrides = SessionOverrides {
        market: args.market,
        fatfinger: args.fatfinger,
    };
    let mut app = Application::new(config, overrides)?;

    match args.command {
        Some(line) => app.run_line(&line).await,
        None => app.run().await?,
    }

    Ok(())
}
