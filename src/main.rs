use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod engines;
mod error;
mod expiration;
mod pipeline;
mod preprocessing;
mod server;
mod views;

#[derive(Parser, Debug)]
#[command(name = "expiry-ocr-server")]
#[command(about = "Scan product photos for expiration dates")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "3000")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// OCR backend to use
    #[arg(long, env = "OCR_ENGINE", value_enum, default_value = "ocrs")]
    pub engine: engines::EngineKind,

    /// URL of the external OCR service (remote engine only)
    #[arg(long, env = "OCR_REMOTE_URL")]
    pub ocr_url: Option<String>,

    /// Timeout for a single call to the external OCR service, in seconds
    #[arg(long, env = "OCR_TIMEOUT_SECS", default_value = "30")]
    pub ocr_timeout_secs: u64,

    /// Image preprocessing preset applied before local recognition
    #[arg(long, env = "OCR_PREPROCESS", value_enum, default_value = "default")]
    pub preprocess: preprocessing::Preset,

    /// Directory for staging uploads while they are scanned
    #[arg(long, env = "OCR_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting expiry-ocr-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Binding to {} with {} engine",
        config.bind_addr(),
        config.engine.as_str()
    );

    server::run(config).await
}
