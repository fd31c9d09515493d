use clap::Parser;
use gemini_chat::config::ChatConfig;
use std::path::PathBuf;

/// Terminal chat client for the Gemini relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Send a single message and print the reply instead of starting a chat
    #[arg(index = 1)] // Positional argument
    pub message: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL of the relay's chat endpoint
    #[arg(long, env = "GEMINI_CHAT_RELAY_URL")]
    pub relay_url: Option<String>,

    /// Directory the transcript is stored in
    #[arg(long, env = "GEMINI_CHAT_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Erase the stored transcript before starting
    #[arg(long, default_value_t = false)]
    pub clear: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Flags given on the command line win over the config file
    pub fn apply(&self, config: &mut ChatConfig) {
        if let Some(url) = &self.relay_url {
            config.relay_url = Some(url.clone());
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir = Some(dir.clone());
        }
        if self.verbose {
            config.log_level = Some("debug".to_string());
        }
    }
}
