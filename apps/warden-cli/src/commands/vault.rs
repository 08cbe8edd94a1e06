//! Encrypt / decrypt commands - vault round trips for one project

use clap::Args;
use warden_auth::{AesGcmVault, CredentialVault};
use warden_core::ProjectId;

use super::value_or_stdin;
use crate::error::{CliError, CliResult};

/// Arguments shared by encrypt and decrypt
#[derive(Args)]
pub struct VaultArgs {
    /// Project the value belongs to
    #[arg(long)]
    pub project: String,

    /// Base64 master key
    #[arg(long, env = "WARDEN_VAULT_KEY", hide_env_values = true)]
    pub key: String,
}

/// Arguments for the encrypt command
#[derive(Args)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub vault: VaultArgs,

    /// Plaintext; read from stdin when omitted
    pub value: Option<String>,
}

/// Arguments for the decrypt command
#[derive(Args)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub vault: VaultArgs,

    /// Ciphertext; read from stdin when omitted
    pub value: Option<String>,
}

impl VaultArgs {
    fn open(&self) -> CliResult<(AesGcmVault, ProjectId)> {
        let project: ProjectId = self
            .project
            .parse()
            .map_err(|e| CliError::Validation(format!("--project: {e}")))?;
        let vault = AesGcmVault::from_base64(&self.key)?;
        if vault.has_insecure_key() {
            tracing::warn!("Using the insecure all-zero development key");
        }
        Ok((vault, project))
    }
}

/// Execute the encrypt command
pub async fn encrypt(args: EncryptArgs) -> CliResult<()> {
    let (vault, project) = args.vault.open()?;
    let plaintext = value_or_stdin(args.value, "value")?;
    println!("{}", vault.encrypt(project, &plaintext).await?);
    Ok(())
}

/// Execute the decrypt command
pub async fn decrypt(args: DecryptArgs) -> CliResult<()> {
    let (vault, project) = args.vault.open()?;
    let ciphertext = value_or_stdin(args.value, "ciphertext")?;
    println!("{}", vault.decrypt(project, ciphertext.trim()).await?);
    Ok(())
}
