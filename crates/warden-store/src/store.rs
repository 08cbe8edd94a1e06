//! Auth provider store: the repository plus the credential vault.
//!
//! Secret params are encrypted before every write and decrypted after every
//! read. Both directions fail closed: one bad param fails the whole call, so
//! nothing half-encrypted is persisted and nothing half-decrypted escapes.

use std::sync::Arc;

use tracing::instrument;
use warden_auth::CredentialVault;
use warden_core::{AuthProvider, AuthProviderParam, ProjectId, ProviderId};

use crate::error::{StoreError, StoreResult};
use crate::repository::{AuthProviderRepository, ProviderFilter, ProviderUpdate};

/// Provider persistence with field-level encryption of secret params.
#[derive(Clone)]
pub struct AuthProviderStore {
    repository: Arc<dyn AuthProviderRepository>,
    vault: Arc<dyn CredentialVault>,
}

impl AuthProviderStore {
    #[must_use]
    pub fn new(repository: Arc<dyn AuthProviderRepository>, vault: Arc<dyn CredentialVault>) -> Self {
        Self { repository, vault }
    }

    /// Fetch one provider with its secrets decrypted.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: ProviderId) -> StoreResult<Option<AuthProvider>> {
        match self.repository.find_by_id(id).await? {
            Some(record) => Ok(Some(self.decrypt_record(record).await?)),
            None => Ok(None),
        }
    }

    /// The project a provider belongs to, without touching its secrets.
    pub async fn project_of(&self, id: ProviderId) -> StoreResult<Option<ProjectId>> {
        Ok(self.repository.find_by_id(id).await?.map(|r| r.project_id))
    }

    /// Fetch every matching provider with secrets decrypted.
    #[instrument(skip(self))]
    pub async fn find(&self, filter: &ProviderFilter) -> StoreResult<Vec<AuthProvider>> {
        let records = self.repository.find(filter).await?;
        let mut decrypted = Vec::with_capacity(records.len());
        for record in records {
            decrypted.push(self.decrypt_record(record).await?);
        }
        Ok(decrypted)
    }

    /// Persist a new provider. `record` carries plaintext secrets and is
    /// returned unchanged on success.
    #[instrument(skip(self, record), fields(provider_id = %record.id, project_id = %record.project_id))]
    pub async fn insert(&self, record: AuthProvider) -> StoreResult<AuthProvider> {
        let stored = AuthProvider {
            params: self.encrypt_params(record.project_id, &record.params).await?,
            ..record.clone()
        };
        self.repository.insert(&stored).await?;
        Ok(record)
    }

    /// Apply a partial update whose `params`, if any, are plaintext.
    ///
    /// `expected_project` is the project the caller was authorized against.
    /// The write only lands while the record still belongs to it; a record
    /// moved away in the meantime yields `Conflict`.
    ///
    /// Secrets are keyed per project, so moving a provider to another project
    /// re-encrypts its stored params even when the update does not replace them.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: ProviderId,
        expected_project: ProjectId,
        mut update: ProviderUpdate,
    ) -> StoreResult<AuthProvider> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)?;
        if existing.project_id != expected_project {
            return Err(StoreError::Conflict(format!("auth provider {id}")));
        }
        let target_project = update.project_id.unwrap_or(expected_project);

        let plaintext = match update.params.take() {
            Some(params) => Some(params),
            None if target_project != expected_project => {
                Some(self.decrypt_params(expected_project, existing.params).await?)
            }
            None => None,
        };
        if let Some(params) = plaintext {
            update.params = Some(self.encrypt_params(target_project, &params).await?);
        }

        let updated = self
            .repository
            .update(id, expected_project, &update)
            .await?
            .ok_or_else(|| StoreError::Conflict(format!("auth provider {id}")))?;

        self.decrypt_record(updated).await
    }

    async fn encrypt_params(
        &self,
        project_id: ProjectId,
        params: &[AuthProviderParam],
    ) -> StoreResult<Vec<AuthProviderParam>> {
        let mut sealed = Vec::with_capacity(params.len());
        for param in params {
            let mut param = param.clone();
            if param.is_secret {
                param.value = self
                    .vault
                    .encrypt(project_id, &param.value)
                    .await
                    .map_err(|e| {
                        tracing::warn!(key = %param.key, error = %e, "Secret parameter encryption failed");
                        StoreError::EncryptionFailed {
                            key: param.key.clone(),
                            reason: e.to_string(),
                        }
                    })?;
            }
            sealed.push(param);
        }
        Ok(sealed)
    }

    async fn decrypt_params(
        &self,
        project_id: ProjectId,
        params: Vec<AuthProviderParam>,
    ) -> StoreResult<Vec<AuthProviderParam>> {
        let mut opened = Vec::with_capacity(params.len());
        for mut param in params {
            if param.is_secret {
                param.value = self
                    .vault
                    .decrypt(project_id, &param.value)
                    .await
                    .map_err(|e| {
                        tracing::warn!(key = %param.key, error = %e, "Secret parameter decryption failed");
                        StoreError::DecryptionFailed {
                            key: param.key.clone(),
                            reason: e.to_string(),
                        }
                    })?;
            }
            opened.push(param);
        }
        Ok(opened)
    }

    async fn decrypt_record(&self, mut record: AuthProvider) -> StoreResult<AuthProvider> {
        let params = std::mem::take(&mut record.params);
        record.params = self.decrypt_params(record.project_id, params).await?;
        Ok(record)
    }
}

impl std::fmt::Debug for AuthProviderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProviderStore").finish_non_exhaustive()
    }
}
