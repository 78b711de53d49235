// curio: point a camera at something and learn what it is

mod config;
mod console;
mod session;
mod text;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use console::Console;
use curio_eye::FacingMode;
use curio_facts::{FactResolver, WikiBackend, WikiClient};
use session::{Phase, ScanSession};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "curio")]
#[command(about = "Identify whatever the camera sees and look up what it is", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Initial camera facing mode: front or back
    #[arg(long, default_value = "back", global = true)]
    facing: String,

    /// Directory for downloaded models
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console (the default)
    Console,

    /// Start the camera, scan once, print the result, and exit
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<tracing::Level>()
        .map_err(|_| anyhow!("Invalid log level: {}", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let mut app_config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(model_dir) = cli.model_dir {
        app_config.vision.model_dir = model_dir;
    }
    app_config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let facing = cli.facing.parse::<FacingMode>().map_err(|e| anyhow!(e))?;

    let client = WikiClient::new(app_config.facts.clone())?;
    let resolver = FactResolver::new(client, app_config.facts.page_base_url.clone());
    let session = ScanSession::new(Arc::new(app_config.vision), resolver, facing);

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => Console::new(session).run().await,
        Commands::Scan => run_single_scan(session).await,
    }
}

/// One-shot scan: start, scan once, print, release
async fn run_single_scan<B: WikiBackend>(mut session: ScanSession<B>) -> Result<()> {
    let started = session.start().await;
    println!("{}", started);

    if session.phase() == Phase::CameraReady {
        let result = session.scan().await;
        println!("{}", result);
    }

    session.stop();
    Ok(())
}
