//! Auth-url command - show where a provider configuration sends users

use std::path::PathBuf;

use clap::Args;
use warden_core::AuthProvider;
use warden_providers::{HttpConfig, ProviderFactory};

use crate::error::CliResult;

/// Arguments for the auth-url command
#[derive(Args)]
pub struct AuthUrlArgs {
    /// Provider configuration (JSON, plaintext params)
    #[arg(long)]
    pub file: PathBuf,

    /// State value to embed; random when omitted
    #[arg(long)]
    pub state: Option<String>,
}

/// Execute the auth-url command
pub fn execute(args: AuthUrlArgs) -> CliResult<()> {
    let raw = std::fs::read_to_string(&args.file)?;
    let config: AuthProvider = serde_json::from_str(&raw)?;

    let adapter = ProviderFactory::with_defaults(&HttpConfig::default()).build(&config)?;
    let state = args
        .state
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    tracing::info!(provider = %config.provider, name = %config.name, "Building authorization URL");
    println!("{}", adapter.auth_code_url(&state)?);
    Ok(())
}
