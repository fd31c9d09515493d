use anyhow::Context;
use clap::Parser;
use gemini_core::client::GeminiClient;
use gemini_core::config::GeminiConfig;
use gemini_relay::config::RelayConfig;
use gemini_relay::http_server;
use gemini_relay::relay::RelayHandler;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relay-daemon", about = "Relays chat messages to the Gemini API")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// Base URL of the generative-language API
    #[arg(long)]
    api_base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Gemini relay daemon");

    // Parse command line args
    let args = Args::parse();

    // Load config from file or use defaults
    let config = match &args.config {
        Some(config_path) => RelayConfig::load_from_file(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?,
        None => RelayConfig::load_from_default().context("Failed to load configuration")?,
    };
    let mut config = config.with_env_overrides();

    // Update config from CLI args
    let cli_overrides = GeminiConfig {
        api_key: None,
        model_name: args.model,
        api_base_url: args.api_base_url,
        request_timeout_secs: args.timeout_secs,
    };
    config.gemini = config.gemini.merge(&cli_overrides);
    if let Some(addr) = args.http_addr {
        config.http_addr = addr;
    }

    // Initialize Gemini client
    let gemini_client = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => {
            info!(endpoint = client.endpoint(), "Initialized Gemini client");
            client
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(anyhow::anyhow!(
                "Failed to initialize Gemini client: {} (set GEMINI_API_KEY)",
                e
            ));
        }
    };

    http_server::run_server(RelayHandler::new(gemini_client), config.http_addr).await?;

    info!("Gemini relay daemon shutting down");
    Ok(())
}
