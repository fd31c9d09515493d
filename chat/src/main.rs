use anyhow::Context;
use clap::Parser;
use gemini_chat::app;
use gemini_chat::config::ChatConfig;
use gemini_chat::session::ChatSession;
use gemini_chat::storage::FileTranscriptStore;
use gemini_chat::transport::HttpRelayTransport;
use log::info;

mod cli;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| ChatConfig::default_dir().map(|dir| dir.join("config.toml")));
    let mut config = match config_path {
        Some(path) => ChatConfig::load_from_file(&path)?,
        None => ChatConfig::default(),
    };
    args.apply(&mut config);

    // Initialize logger with configured log level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level().to_string()),
    )
    .init();

    let store = FileTranscriptStore::new(&config.storage_dir(), config.storage_key());
    info!("Using transcript at {}", store.path().display());

    let transport = HttpRelayTransport::new(config.relay_url(), config.request_timeout())
        .context("Failed to initialize relay transport")?;
    info!("Relaying messages to {}", transport.url());

    let mut session = ChatSession::open(Box::new(store));
    if args.clear {
        session.clear();
    }

    match args.message {
        Some(message) => app::run_single_message(&mut session, &transport, message).await,
        None => app::run_interactive_chat(&mut session, &transport).await,
    }
}
