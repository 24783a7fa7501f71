mod annotate_cmd;
mod providers;
mod status_cmd;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use textgrab_config::{
    collect_redacted_paths, config_file_path, ensure_valid, load_with_env, process_env, redact,
    TextGrabConfig,
};
use textgrab_gateway::{start_server, GatewayState, RateLimiter};
use textgrab_logging::init_logger;
use textgrab_understanding::Annotator;

use providers::{build_providers, summary_options};

#[derive(Parser)]
#[command(name = "textgrab")]
#[command(about = "TextGrab: OCR with text layout reconstruction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Recognize a local image and print the reconstructed layout as JSON
    Annotate {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,
        /// Write an image with block and line boxes drawn on it
        #[arg(long)]
        overlay: Option<PathBuf>,
    },
    /// Check whether a server is running
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env = process_env();
    if let Commands::Serve { port: Some(port) } = &cli.command {
        env.insert("PORT".to_string(), port.to_string());
    }
    let config_path = config_file_path(&env);
    let config = load_with_env(&config_path, &env).await?;

    init_logger(config.log_level(), config.log_dir().map(Path::new));

    match cli.command {
        Commands::Serve { .. } => run_server(config).await?,
        Commands::Annotate { image, overlay } => {
            annotate_cmd::run(&config, &image, overlay.as_deref()).await?
        }
        Commands::Status { port } => {
            let port = port
                .or(config.port())
                .context("No port given; pass --port or set PORT")?;
            status_cmd::run(port).await?
        }
    }

    Ok(())
}

async fn run_server(config: TextGrabConfig) -> Result<()> {
    ensure_valid(&config)?;
    let raw = serde_json::to_value(&config).context("Failed to serialize config")?;
    info!(
        config = %redact(&raw),
        redacted = ?collect_redacted_paths(&raw),
        "Loaded configuration"
    );

    let port = config.port().context("port is required")?;
    let addr: SocketAddr = format!("{}:{}", config.bind_address(), port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address()))?;

    let providers = build_providers(&config)?;
    let (max_requests, window_secs) = config.rate_limit();

    let mut state = GatewayState::new(
        Annotator::new(providers.ocr),
        RateLimiter::new(max_requests, window_secs),
    )
    .with_summary_options(summary_options(&config))
    .with_max_body_bytes(config.max_body_bytes());
    if let Some(summarizer) = providers.summarizer {
        state = state.with_summarizer(summarizer);
    }
    if let Some(translator) = providers.translator {
        state = state.with_translator(translator);
    }

    info!(
        %addr,
        max_requests,
        window_secs,
        max_body_bytes = config.max_body_bytes(),
        "Starting TextGrab API"
    );
    start_server(addr, state).await
}
