//! Password hashing and credential vault for warden.
//!
//! This crate provides:
//! - Argon2id password hashing ([`PasswordHasher`])
//! - The [`CredentialVault`] encrypt/decrypt boundary used for provider secrets
//! - [`AesGcmVault`], an AES-256-GCM vault with per-project key derivation
//!
//! # Example
//!
//! ```rust
//! use warden_auth::{AesGcmVault, generate_master_key};
//! use warden_core::ProjectId;
//!
//! let vault = AesGcmVault::new(generate_master_key());
//! let project = ProjectId::new();
//!
//! let sealed = vault.seal(project, "client-secret").unwrap();
//! assert_eq!(vault.open(project, &sealed).unwrap(), "client-secret");
//! ```

mod error;
mod password;
mod vault;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password, PasswordHasher};
pub use vault::{
    generate_master_key, generate_master_key_base64, AesGcmVault, CredentialVault,
};
