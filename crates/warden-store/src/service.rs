//! Auth provider service: project scoping over the store, plus adapter
//! construction through the provider factory.

use chrono::Utc;
use tracing::instrument;
use warden_core::{AuthProvider, CreateAuthProvider, ProjectAccess, ProjectId, ProviderId};
use warden_providers::{OAuthProvider, ProviderFactory};

use crate::error::{StoreError, StoreResult};
use crate::repository::{ProviderFilter, ProviderUpdate};
use crate::store::AuthProviderStore;

/// Provider configuration management for authorized callers.
#[derive(Debug, Clone)]
pub struct AuthProviderService {
    store: AuthProviderStore,
    factory: ProviderFactory,
}

impl AuthProviderService {
    #[must_use]
    pub fn new(store: AuthProviderStore, factory: ProviderFactory) -> Self {
        Self { store, factory }
    }

    /// Fetch a provider with secrets decrypted.
    ///
    /// Unless `dont_check_projects` is set, a provider outside the caller's
    /// projects is reported as `NotFound`.
    #[instrument(skip(self, access), fields(actor = %access.actor()))]
    pub async fn get(
        &self,
        access: &ProjectAccess,
        id: ProviderId,
        dont_check_projects: bool,
    ) -> StoreResult<AuthProvider> {
        let provider = self.store.find_by_id(id).await?.ok_or(StoreError::NotFound)?;

        if !dont_check_projects && !access.can_access(&provider) {
            return Err(StoreError::NotFound);
        }
        Ok(provider)
    }

    /// Every provider in the caller's projects.
    #[instrument(skip(self, access), fields(actor = %access.actor()))]
    pub async fn get_all(&self, access: &ProjectAccess) -> StoreResult<Vec<AuthProvider>> {
        self.store
            .find(&ProviderFilter::in_projects(access.projects()))
            .await
    }

    /// Enabled providers of one project, for rendering a login page.
    #[instrument(skip(self))]
    pub async fn list_enabled(&self, project_id: ProjectId) -> StoreResult<Vec<AuthProvider>> {
        self.store
            .find(&ProviderFilter::in_projects([project_id]).enabled_only())
            .await
    }

    /// Create a provider in one of the caller's projects.
    #[instrument(skip(self, access, input), fields(actor = %access.actor(), project_id = %input.project_id))]
    pub async fn create(
        &self,
        access: &ProjectAccess,
        input: CreateAuthProvider,
    ) -> StoreResult<AuthProvider> {
        if !access.allows(input.project_id) {
            return Err(StoreError::ProjectNotFound(input.project_id));
        }

        let now = Utc::now();
        let record = AuthProvider {
            id: ProviderId::new(),
            name: input.name,
            icon: input.icon,
            provider: input.provider,
            project_id: input.project_id,
            params: input.params,
            enabled: true,
            created_at: now,
            created_by: access.actor(),
            updated_at: now,
            updated_by: access.actor(),
        };

        let created = self.store.insert(record).await?;

        tracing::info!(
            provider_id = %created.id,
            provider_type = %created.provider,
            project_id = %created.project_id,
            "Auth provider created"
        );

        Ok(created)
    }

    /// Replace a provider's mutable fields with `payload`.
    ///
    /// `payload.created_at` / `created_by` are ignored; the stored values are
    /// kept. Secret params are re-encrypted before the write.
    #[instrument(skip(self, access, payload), fields(actor = %access.actor(), provider_id = %payload.id))]
    pub async fn update(
        &self,
        access: &ProjectAccess,
        payload: AuthProvider,
    ) -> StoreResult<AuthProvider> {
        let id = payload.id;
        let current_project = self.check_visible(access, id).await?;

        if !access.allows(payload.project_id) {
            return Err(StoreError::ProjectNotFound(payload.project_id));
        }

        let updated = self
            .store
            .update(
                id,
                current_project,
                ProviderUpdate::replace_with(payload, access.actor(), Utc::now()),
            )
            .await?;

        tracing::info!(
            provider_id = %updated.id,
            project_id = %updated.project_id,
            enabled = updated.enabled,
            "Auth provider updated"
        );

        Ok(updated)
    }

    /// Enable or disable a provider.
    #[instrument(skip(self, access), fields(actor = %access.actor()))]
    pub async fn set_enabled(
        &self,
        access: &ProjectAccess,
        id: ProviderId,
        enabled: bool,
    ) -> StoreResult<AuthProvider> {
        let current_project = self.check_visible(access, id).await?;

        let mut update = ProviderUpdate::touch(access.actor(), Utc::now());
        update.enabled = Some(enabled);
        let updated = self.store.update(id, current_project, update).await?;

        tracing::info!(provider_id = %id, enabled, "Auth provider enablement changed");

        Ok(updated)
    }

    /// Build the adapter for an already-loaded configuration.
    pub fn instantiate(&self, config: &AuthProvider) -> StoreResult<Box<dyn OAuthProvider>> {
        Ok(self.factory.build(config)?)
    }

    /// Load an enabled provider of `project_id` and build its adapter.
    ///
    /// Used on login callbacks, where the caller is the end user and has no
    /// project access of their own.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        project_id: ProjectId,
        id: ProviderId,
    ) -> StoreResult<Box<dyn OAuthProvider>> {
        let config = self
            .store
            .find_by_id(id)
            .await?
            .filter(|p| p.project_id == project_id)
            .ok_or(StoreError::NotFound)?;

        if !config.enabled {
            return Err(StoreError::ProviderDisabled(id));
        }
        self.instantiate(&config)
    }

    /// The provider's current project, if the caller may see it.
    async fn check_visible(&self, access: &ProjectAccess, id: ProviderId) -> StoreResult<ProjectId> {
        match self.store.project_of(id).await? {
            Some(project) if access.allows(project) => Ok(project),
            _ => Err(StoreError::NotFound),
        }
    }
}
