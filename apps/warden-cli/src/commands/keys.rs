//! Gen-key command - print a fresh vault master key

use clap::Args;
use warden_auth::generate_master_key_base64;

use crate::error::CliResult;

/// Arguments for the gen-key command
#[derive(Args)]
pub struct GenKeyArgs {}

/// Execute the gen-key command
pub fn execute(_args: GenKeyArgs) -> CliResult<()> {
    println!("{}", generate_master_key_base64());
    tracing::info!("Generated vault master key; store it as WARDEN_VAULT_KEY");
    Ok(())
}
