//! Hash-password command

use clap::Args;
use warden_store::Argon2Settings;

use super::value_or_stdin;
use crate::error::{CliError, CliResult};

/// Arguments for the hash-password command
#[derive(Args)]
pub struct HashPasswordArgs {
    /// Password to hash; read from stdin when omitted
    pub password: Option<String>,

    /// Argon2 memory cost in KiB
    #[arg(long, env = "WARDEN_ARGON2_MEMORY_KIB", default_value_t = 19_456)]
    pub memory_kib: u32,

    /// Argon2 iterations
    #[arg(long, env = "WARDEN_ARGON2_ITERATIONS", default_value_t = 2)]
    pub iterations: u32,

    /// Argon2 parallelism
    #[arg(long, env = "WARDEN_ARGON2_PARALLELISM", default_value_t = 1)]
    pub parallelism: u32,
}

/// Execute the hash-password command
pub fn execute(args: HashPasswordArgs) -> CliResult<()> {
    let settings = Argon2Settings {
        memory_kib: args.memory_kib,
        iterations: args.iterations,
        parallelism: args.parallelism,
    };
    let hasher = settings
        .hasher()
        .map_err(|e| CliError::Validation(e.to_string()))?;

    let password = value_or_stdin(args.password, "password")?;
    println!("{}", hasher.hash(&password)?);
    Ok(())
}
