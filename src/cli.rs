//! CLI command definitions and dispatch.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use portal_auth::rbac::role_table;
use portal_core::config::AppConfig;
use portal_core::error::AppError;
use portal_directory::MemoryUserDirectory;
use portal_service::PortalState;

/// Support Portal authentication and role checks
#[derive(Debug, Parser)]
#[command(name = "portal", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and print the issued token
    Login {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Validate a token and print its claims
    Verify {
        /// Encoded token
        #[arg(short, long)]
        token: String,
    },
    /// Print the role hierarchy
    Roles,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let state = PortalState::new(config, Arc::new(MemoryUserDirectory::new()))?;
        state.bootstrap().await?;

        match &self.command {
            Commands::Login { username, password } => {
                let result = state.login(username, password).await?;
                println!("{}: {}", result.token.header_name, result.token.token);
                println!("expires: {}", result.token.expires_at.to_rfc3339());
            }
            Commands::Verify { token } => {
                let claims = state.tokens.validate(token)?;
                println!("{}", serde_json::to_string_pretty(&claims)?);
            }
            Commands::Roles => {
                println!("{:<12} {:>5}  AUTHORITIES", "ROLE", "LEVEL");
                for grant in role_table() {
                    println!(
                        "{:<12} {:>5}  {}",
                        grant.role.as_str(),
                        grant.level,
                        grant.authorities.join(", ")
                    );
                }
            }
        }

        Ok(())
    }
}
