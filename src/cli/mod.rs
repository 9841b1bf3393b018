//! Command-line entry point
//!
//! Parses arguments, installs logging, and runs the interactive menu on a
//! tokio runtime.

use std::env;
use std::error::Error;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::HttpCompletionClient;
use crate::auth::Credential;
use crate::core::app::{MenuController, SessionContext};
use crate::core::config::Config;
use crate::core::settings::default_settings;
use crate::utils::console::Console;

/// Environment variable holding the log filter (EnvFilter syntax).
pub const LOG_ENV: &str = "PROMPTDECK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

#[derive(Parser)]
#[command(name = "promptdeck", version)]
#[command(about = "A menu-driven terminal client for text-completion APIs")]
#[command(
    long_about = "Promptdeck is a menu-driven terminal client that sends prompts to an \
OpenAI-compatible completions API and prints the responses. Chat history can be \
exported to JSON and query settings edited from the menu.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your API key (prompted for when missing or rejected)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  PROMPTDECK_LOG    Diagnostic log filter written to stderr (default: warn)\n\n\
Menu:\n\
  1                 Chat\n\
  2                 Copilot (responses also stored as copilot responses)\n\
  3                 Export chat history\n\
  s                 Settings\n\
  ?                 Help\n\
  x                 Exit"
)]
pub struct Args {}

pub fn main() -> Result<(), Box<dyn Error>> {
    let _args = Args::parse();
    init_tracing();

    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let base_url = config.resolve_base_url(env::var(BASE_URL_ENV).ok());
    info!(%base_url, "Starting promptdeck v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpCompletionClient::new(reqwest::Client::new(), base_url);
    let context = SessionContext::new(
        default_settings(),
        Credential::from_env(),
        config.export_dir(),
    );

    let mut app = MenuController::new(context, Console::stdio(), client);
    app.run().await?;
    Ok(())
}
