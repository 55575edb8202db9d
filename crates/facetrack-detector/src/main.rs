//! Detection client binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use facetrack_detector::{ApiUploader, DetectionSession, DetectorConfig, Replay};

#[derive(Parser)]
#[command(name = "facetrack-detector", about = "Face detection client for the face data API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the detection loop with recorded model output
    Replay {
        /// Recording file (JSON array of frames)
        #[arg(short, long)]
        input: PathBuf,
        /// Base URL of the face data API
        #[arg(long, env = "FACETRACK_API_URL", default_value = "http://localhost:3000")]
        api: String,
        /// Milliseconds between detection ticks
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
        /// Start with the mesh overlay disabled
        #[arg(long)]
        no_mesh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            input,
            api,
            interval_ms,
            no_mesh,
        } => {
            let config = DetectorConfig {
                api_url: api,
                interval: Duration::from_millis(interval_ms),
                show_mesh: !no_mesh,
                ..DetectorConfig::from_env()
            };
            replay(&input, config).await?;
        }
    }

    Ok(())
}

async fn replay(input: &Path, config: DetectorConfig) -> Result<()> {
    config.validate()?;

    let recording = Replay::load(input)
        .await
        .with_context(|| format!("Failed to load recording {}", input.display()))?;
    let (source, estimator) = recording.into_parts();
    let uploader = ApiUploader::new(&config.api_url, config.request_timeout)
        .context("Failed to build HTTP client")?;

    info!(
        api = uploader.endpoint(),
        interval_ms = config.interval.as_millis() as u64,
        "Starting replay"
    );

    let mut session = DetectionSession::new(source, estimator, uploader);
    session.set_show_mesh(config.show_mesh);

    let ticks = session.run(config.interval, shutdown_signal()).await?;

    info!(ticks, "Replay finished");
    Ok(())
}

fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("facetrack=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().compact().with_target(false))
            .with(env_filter)
            .init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
}
