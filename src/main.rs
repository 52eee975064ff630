use anyhow::Context;
use clap::Parser;
use research_forge::server::{serve, AppState};
use research_forge::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ResearchForge AI web service: arXiv paper search, proposal and email
/// drafting, and a Gemini-backed research chat assistant.
#[derive(Debug, Parser)]
#[command(name = "research-forge", version, about)]
struct Args {
    /// Listen port (overrides the PORT environment variable)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first, so the environment is complete before anything reads it
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        "Starting ResearchForge AI v{} with {} fallback models",
        env!("CARGO_PKG_VERSION"),
        config.models.len()
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    let state = AppState::new(Arc::new(config)).context("Failed to initialize components")?;

    serve(state, addr).await.context("Server failed")?;

    Ok(())
}
