//! CLI command definitions and dispatch.

pub mod migrate;
pub mod password;
pub mod principal;
pub mod serve;
pub mod token;
pub mod watch;

use clap::{Parser, Subcommand};

use society_core::config::AppConfig;
use society_core::error::AppError;

use crate::output::OutputFormat;

/// Society hub operator tool
#[derive(Debug, Parser)]
#[command(name = "society-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment; loads `config/{env}.toml` over the defaults
    #[arg(short, long, env = "SOCIETY_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin, guard, and resident accounts
    Principal(principal::PrincipalArgs),
    /// Sign a token for an existing principal
    Token(token::TokenArgs),
    /// Hash a password for manual inserts
    HashPassword(password::HashPasswordArgs),
    /// Log in against a running server and stream live events
    Watch(watch::WatchArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Principal(args) => principal::execute(args, &self.env, self.format).await,
            Commands::Token(args) => token::execute(args, &self.env, self.format),
            Commands::HashPassword(args) => password::execute(args),
            Commands::Watch(args) => watch::execute(args, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: prompt for a password, optionally with confirmation
pub fn prompt_password(confirm: bool) -> Result<String, AppError> {
    let prompt = dialoguer::Password::new().with_prompt("Password");
    let prompt = if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match")
    } else {
        prompt
    };
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
