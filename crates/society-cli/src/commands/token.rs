//! Token signing for existing principals.

use chrono::Duration;
use clap::Args;
use serde::Serialize;

use society_auth::{IssuedToken, JwtEncoder};
use society_core::error::AppError;
use society_entity::{PrincipalId, Role};

use crate::output::{self, OutputFormat};

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Principal id within its role's table
    #[arg(long)]
    pub id: PrincipalId,
    /// Role claim
    #[arg(short, long)]
    pub role: Role,
    /// Email claim
    #[arg(short, long)]
    pub email: String,
    /// Lifetime in minutes; defaults to `auth.token_ttl_minutes`
    #[arg(long)]
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
struct TokenOutput<'a> {
    id: PrincipalId,
    role: Role,
    #[serde(flatten)]
    issued: &'a IssuedToken,
}

/// Execute the token command
pub fn execute(args: &TokenArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let encoder = JwtEncoder::new(&config.auth);

    let issued = match args.ttl_minutes {
        Some(minutes) => {
            encoder.issue_with_ttl(args.id, args.role.as_str(), &args.email, Duration::minutes(minutes))?
        }
        None => encoder.issue(args.id, args.role, &args.email)?,
    };

    match format {
        OutputFormat::Json => output::print_item(
            &TokenOutput {
                id: args.id,
                role: args.role,
                issued: &issued,
            },
            format,
        ),
        OutputFormat::Table => {
            output::print_kv("Principal", &format!("{} #{}", args.role, args.id));
            output::print_kv("Expires", &issued.expires_at.to_rfc3339());
            println!("{}", issued.token);
        }
    }

    Ok(())
}
