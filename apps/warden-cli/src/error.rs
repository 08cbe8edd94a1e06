//! CLI error types and exit codes
//!
//! - 0: Success
//! - 1: General error
//! - 3: Network error
//! - 4: Validation error
//! - 6: Vault or hashing error

use thiserror::Error;
use warden_auth::AuthError;
use warden_providers::ProviderError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] AuthError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 4,
            CliError::Crypto(_) => 6,
            CliError::Provider(e) if e.upstream().is_some() => 3,
            CliError::Provider(_) => 4,
            CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr
    pub fn print(&self) {
        eprintln!("Error: {self}");
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Validation(format!("Invalid JSON: {e}"))
    }
}
