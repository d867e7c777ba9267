//! Support Portal trust-and-access command line.
//!
//! Loads configuration, installs logging, seeds the super-admin account, and
//! runs one command against the in-memory directory.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use portal_core::config::AppConfig;
use portal_core::error::AppError;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let cli = Cli::parse();

    if let Err(e) = cli.execute(config).await {
        eprintln!("Error [{}]: {}", e.kind, e.message);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `PORTAL__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PORTAL_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
