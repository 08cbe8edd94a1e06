//! warden CLI - operator tooling for the identity provider core
//!
//! - Generate vault master keys
//! - Hash passwords the way the password service stores them
//! - Encrypt and decrypt secret params for a project
//! - Print the authorization URL a stored provider configuration produces

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;

use error::CliResult;

/// warden CLI - Identity provider configuration tooling
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random vault master key (base64)
    GenKey(commands::keys::GenKeyArgs),

    /// Hash a password with Argon2id
    HashPassword(commands::hash::HashPasswordArgs),

    /// Encrypt a secret value for a project
    Encrypt(commands::vault::EncryptArgs),

    /// Decrypt a secret value for a project
    Decrypt(commands::vault::DecryptArgs),

    /// Print the authorization URL for a provider configuration file
    AuthUrl(commands::auth_url::AuthUrlArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init_logging("info", cli.log_json);

    match run(cli.command).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::GenKey(args) => commands::keys::execute(args),
        Commands::HashPassword(args) => commands::hash::execute(args),
        Commands::Encrypt(args) => commands::vault::encrypt(args).await,
        Commands::Decrypt(args) => commands::vault::decrypt(args).await,
        Commands::AuthUrl(args) => commands::auth_url::execute(args),
    }
}
