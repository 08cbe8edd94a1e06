//! Credential vault: field-level encryption for stored provider secrets.
//!
//! The store layer only depends on [`CredentialVault`]. [`AesGcmVault`] is the
//! bundled implementation: AES-256-GCM with a per-project key derived from a
//! master key via HKDF-SHA256, so ciphertext from one project never decrypts
//! under another.

use crate::error::{AuthError, AuthResult};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use warden_core::ProjectId;

/// AES-256-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;

/// HKDF salt separating vault keys from any other use of the master key.
const KEY_DERIVATION_SALT: &[u8] = b"warden-credential-vault-v1";

/// Encrypt/Decrypt capability consumed by the store layer.
///
/// Implementations may call a remote key service; callers bound the call by
/// dropping the future.
#[async_trait]
pub trait CredentialVault: Send + Sync {
    /// Encrypt `plaintext` for `project_id`, returning a printable ciphertext.
    async fn encrypt(&self, project_id: ProjectId, plaintext: &str) -> AuthResult<String>;

    /// Decrypt a value produced by [`CredentialVault::encrypt`] for the same project.
    async fn decrypt(&self, project_id: ProjectId, ciphertext: &str) -> AuthResult<String>;
}

/// Local AES-256-GCM vault.
#[derive(Clone)]
pub struct AesGcmVault {
    master_key: [u8; 32],
}

impl std::fmt::Debug for AesGcmVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmVault")
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

impl AesGcmVault {
    /// Create a vault from a raw 32-byte master key.
    #[must_use]
    pub fn new(master_key: [u8; 32]) -> Self {
        Self { master_key }
    }

    /// Create a vault from a base64-encoded 32-byte master key.
    pub fn from_base64(master_key_base64: &str) -> AuthResult<Self> {
        let key_bytes = BASE64
            .decode(master_key_base64.trim())
            .map_err(|e| AuthError::InvalidKey(format!("Invalid base64 key: {e}")))?;

        let master_key: [u8; 32] = key_bytes.as_slice().try_into().map_err(|_| {
            AuthError::InvalidKey(format!(
                "Master key must be 32 bytes, got {}",
                key_bytes.len()
            ))
        })?;

        Ok(Self::new(master_key))
    }

    /// Whether the master key is all zeroes (development placeholder).
    #[must_use]
    pub fn has_insecure_key(&self) -> bool {
        self.master_key.iter().all(|b| *b == 0)
    }

    fn cipher_for(&self, project_id: ProjectId) -> AuthResult<Aes256Gcm> {
        let hkdf = Hkdf::<Sha256>::new(Some(KEY_DERIVATION_SALT), &self.master_key);

        let mut derived = [0u8; 32];
        hkdf.expand(project_id.as_uuid().as_bytes(), &mut derived)
            .map_err(|e| AuthError::InvalidKey(format!("Key derivation failed: {e}")))?;

        Aes256Gcm::new_from_slice(&derived).map_err(|e| AuthError::InvalidKey(e.to_string()))
    }

    /// Encrypt synchronously. Output: base64(nonce || ciphertext).
    pub fn seal(&self, project_id: ProjectId, plaintext: &str) -> AuthResult<String> {
        let cipher = self.cipher_for(project_id)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AuthError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(sealed))
    }

    /// Decrypt synchronously.
    pub fn open(&self, project_id: ProjectId, sealed: &str) -> AuthResult<String> {
        let raw = BASE64
            .decode(sealed)
            .map_err(|_| AuthError::DecryptionFailed("Ciphertext is not valid base64".to_string()))?;

        if raw.len() < NONCE_SIZE {
            return Err(AuthError::DecryptionFailed(
                "Encrypted data too short".to_string(),
            ));
        }

        let cipher = self
            .cipher_for(project_id)
            .map_err(|e| AuthError::DecryptionFailed(e.to_string()))?;

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_SIZE);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| AuthError::DecryptionFailed("Authentication tag mismatch".to_string()))?;

        String::from_utf8(plaintext).map_err(|e| AuthError::DecryptionFailed(e.to_string()))
    }
}

#[async_trait]
impl CredentialVault for AesGcmVault {
    async fn encrypt(&self, project_id: ProjectId, plaintext: &str) -> AuthResult<String> {
        self.seal(project_id, plaintext)
    }

    async fn decrypt(&self, project_id: ProjectId, ciphertext: &str) -> AuthResult<String> {
        self.open(project_id, ciphertext)
    }
}

/// Generate a random 32-byte master key.
#[must_use]
pub fn generate_master_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut key);
    key
}

/// Generate a random master key as a base64 string.
#[must_use]
pub fn generate_master_key_base64() -> String {
    BASE64.encode(generate_master_key())
}
