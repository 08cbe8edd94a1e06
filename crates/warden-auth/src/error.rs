//! Error types for hashing and vault operations.

use thiserror::Error;

/// Result alias for this crate.
pub type AuthResult<T> = Result<T, AuthError>;

/// Hashing and credential vault errors.
///
/// Messages never include the plaintext or ciphertext being processed.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Password errors
    /// Password hashing operation failed.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Password hash format is invalid.
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    // Vault errors
    /// A value could not be encrypted.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// A value could not be decrypted (wrong key, wrong project, tampered data).
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Master key is malformed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl AuthError {
    /// Check if this error is related to password operations.
    #[must_use]
    pub fn is_password_error(&self) -> bool {
        matches!(self, AuthError::HashingFailed(_) | AuthError::InvalidHashFormat)
    }

    /// Check if this error came from the vault.
    #[must_use]
    pub fn is_vault_error(&self) -> bool {
        matches!(
            self,
            AuthError::EncryptionFailed(_) | AuthError::DecryptionFailed(_) | AuthError::InvalidKey(_)
        )
    }
}
