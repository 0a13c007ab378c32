//! Database migration management commands.

use clap::{Args, Subcommand};

use society_core::error::AppError;
use society_database::DatabasePool;
use society_database::migration::{migration_plan, run_migrations};

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations against every configured database
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let db = &config.database;

    if db.provider != "postgres" {
        output::print_warning("The memory provider has no schema; nothing to migrate.");
        return Ok(());
    }

    match &args.command {
        MigrateCommand::Run => {
            for (url, schemas) in migration_plan(db) {
                println!("Running database migrations...");
                let pool = DatabasePool::connect(db, url).await?;
                run_migrations(pool.pool(), &schemas).await?;
                pool.close().await;
            }
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
