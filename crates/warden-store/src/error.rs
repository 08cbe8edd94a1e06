//! Store and service error types.

use thiserror::Error;
use warden_core::{ProjectId, ProviderId};
use warden_providers::ProviderError;

/// Result type for store and service operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by repositories, the provider store and the services.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record does not exist or is outside the caller's projects.
    #[error("Not found")]
    NotFound,

    #[error("Already exists")]
    AlreadyExists,

    /// The target project is not one the caller may act on.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Provider is disabled: {0}")]
    ProviderDisabled(ProviderId),

    /// A secret parameter could not be encrypted; nothing was written.
    #[error("Failed to encrypt parameter '{key}': {reason}")]
    EncryptionFailed { key: String, reason: String },

    /// A secret parameter could not be decrypted; nothing was returned.
    #[error("Failed to decrypt parameter '{key}': {reason}")]
    DecryptionFailed { key: String, reason: String },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The record changed between validation and write.
    #[error("Concurrent modification of {0}")]
    Conflict(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Get the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound => "not_found",
            StoreError::AlreadyExists => "already_exists",
            StoreError::ProjectNotFound(_) => "project_not_found",
            StoreError::ProviderDisabled(_) => "provider_disabled",
            StoreError::EncryptionFailed { .. } => "encryption_failed",
            StoreError::DecryptionFailed { .. } => "decryption_failed",
            StoreError::Hashing(_) => "hashing_failed",
            StoreError::Conflict(_) => "conflict",
            StoreError::InvalidRecord(_) => "invalid_record",
            StoreError::Provider(e) => e.error_code(),
            StoreError::Database(_) => "database_error",
        }
    }

    /// Map an insert failure, turning unique-key violations into `AlreadyExists`.
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => StoreError::AlreadyExists,
            _ => StoreError::Database(err),
        }
    }
}
