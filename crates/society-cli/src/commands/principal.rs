//! Principal (admin, guard, resident) management commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use society_auth::JwtEncoder;
use society_core::error::AppError;
use society_database::StoreManager;
use society_entity::{FlatKey, Principal, Role};
use society_service::AuthService;

use crate::output::{self, OutputFormat};

/// Arguments for principal commands
#[derive(Debug, Args)]
pub struct PrincipalArgs {
    /// Principal subcommand
    #[command(subcommand)]
    pub command: PrincipalCommand,
}

/// Principal subcommands
#[derive(Debug, Subcommand)]
pub enum PrincipalCommand {
    /// Create a principal in the table its role belongs to
    Add {
        /// Role: Admin, Guard, Owner, Tenant, or "Family Member"
        #[arg(short, long)]
        role: Role,
        /// Full name
        #[arg(short, long)]
        name: String,
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Flat as WING-UNIT, required for residents
        #[arg(long)]
        flat: Option<FlatKey>,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Look up a principal by role and email
    Show {
        /// Role to search under
        #[arg(short, long)]
        role: Role,
        /// Login email
        email: String,
    },
}

/// Principal display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PrincipalRow {
    /// Row id
    id: i64,
    /// Role
    role: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Flat
    flat: String,
}

impl From<&Principal> for PrincipalRow {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            role: p.role.to_string(),
            name: p.name.clone(),
            email: p.email.clone(),
            flat: p.flat.as_ref().map(ToString::to_string).unwrap_or_default(),
        }
    }
}

/// Execute principal commands
pub async fn execute(args: &PrincipalArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    if config.database.provider == "memory" {
        output::print_warning("The memory provider is per-process; changes vanish when this command exits.");
    }

    let stores = StoreManager::new(&config.database).await?;
    let result = run(args, &config.auth, &stores, format).await;
    stores.close().await;
    result
}

async fn run(
    args: &PrincipalArgs,
    auth: &society_core::config::AuthConfig,
    stores: &StoreManager,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PrincipalCommand::Add {
            role,
            name,
            email,
            flat,
            password,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => super::prompt_password(true)?,
            };

            let service = AuthService::new(stores.principals(), Arc::new(JwtEncoder::new(auth)));
            let principal = service
                .provision(*role, name, email, &password, flat.clone())
                .await?;

            output::print_list(&[PrincipalRow::from(&principal)], format);
            output::print_success(&format!("{} '{}' created", principal.role, principal.email));
        }
        PrincipalCommand::Show { role, email } => {
            let record = stores
                .principals()
                .find_by_email(role.kind(), email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("No {} with email '{email}'", role.kind())))?;
            let stored_role = record.stored_role();
            let principal = Principal::from_record(record, stored_role);
            output::print_list(&[PrincipalRow::from(&principal)], format);
        }
    }

    Ok(())
}
