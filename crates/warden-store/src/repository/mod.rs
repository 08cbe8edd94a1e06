//! Document-style persistence for provider configurations and password
//! accounts.
//!
//! Repositories store exactly what they are given: secret params arrive
//! already encrypted and leave still encrypted. The vault is applied one
//! layer up, in [`crate::store::AuthProviderStore`].

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use warden_core::{
    AuthProvider, AuthProviderParam, ProjectId, ProviderId, ProviderType, UserId, WithPasswordUser,
};

use crate::error::StoreResult;

pub use memory::{InMemoryAuthProviderRepository, InMemoryPasswordUserRepository};
pub use postgres::{PgAuthProviderRepository, PgPasswordUserRepository};

/// Selects provider records. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFilter {
    pub projects: Option<Vec<ProjectId>>,
    pub enabled: Option<bool>,
}

impl ProviderFilter {
    /// Records in any of `projects`.
    #[must_use]
    pub fn in_projects(projects: impl IntoIterator<Item = ProjectId>) -> Self {
        Self {
            projects: Some(projects.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn enabled_only(mut self) -> Self {
        self.enabled = Some(true);
        self
    }

    /// Whether `record` satisfies the filter.
    #[must_use]
    pub fn matches(&self, record: &AuthProvider) -> bool {
        self.projects
            .as_ref()
            .map_or(true, |p| p.contains(&record.project_id))
            && self.enabled.map_or(true, |e| record.enabled == e)
    }
}

/// Partial update of a provider's mutable fields.
///
/// `created_at` and `created_by` have no counterpart here, so no update can
/// touch them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub provider: Option<ProviderType>,
    pub project_id: Option<ProjectId>,
    pub params: Option<Vec<AuthProviderParam>>,
    pub enabled: Option<bool>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: UserId,
}

impl ProviderUpdate {
    /// An update that only stamps the audit fields.
    #[must_use]
    pub fn touch(updated_by: UserId, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            icon: None,
            provider: None,
            project_id: None,
            params: None,
            enabled: None,
            updated_at,
            updated_by,
        }
    }

    /// Replace every mutable field with the payload's values.
    #[must_use]
    pub fn replace_with(payload: AuthProvider, updated_by: UserId, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: Some(payload.name),
            icon: Some(payload.icon),
            provider: Some(payload.provider),
            project_id: Some(payload.project_id),
            params: Some(payload.params),
            enabled: Some(payload.enabled),
            updated_at,
            updated_by,
        }
    }

    /// Apply to an in-memory record.
    pub fn apply_to(&self, record: &mut AuthProvider) {
        if let Some(name) = &self.name {
            record.name.clone_from(name);
        }
        if let Some(icon) = &self.icon {
            record.icon.clone_from(icon);
        }
        if let Some(provider) = self.provider {
            record.provider = provider;
        }
        if let Some(project_id) = self.project_id {
            record.project_id = project_id;
        }
        if let Some(params) = &self.params {
            record.params.clone_from(params);
        }
        if let Some(enabled) = self.enabled {
            record.enabled = enabled;
        }
        record.updated_at = self.updated_at;
        record.updated_by = self.updated_by;
    }
}

/// Storage of provider configurations.
#[async_trait]
pub trait AuthProviderRepository: Send + Sync {
    async fn find_by_id(&self, id: ProviderId) -> StoreResult<Option<AuthProvider>>;

    /// Matching records, oldest first.
    async fn find(&self, filter: &ProviderFilter) -> StoreResult<Vec<AuthProvider>>;

    /// Insert a new record. `AlreadyExists` when the id is taken.
    async fn insert(&self, record: &AuthProvider) -> StoreResult<()>;

    /// Apply `update` atomically, provided the record still belongs to
    /// `expected_project`. Returns the updated record, or `None` when no
    /// record matched.
    async fn update(
        &self,
        id: ProviderId,
        expected_project: ProjectId,
        update: &ProviderUpdate,
    ) -> StoreResult<Option<AuthProvider>>;
}

/// Storage of password accounts, unique per (project, email).
#[async_trait]
pub trait PasswordUserRepository: Send + Sync {
    async fn find_by_email(
        &self,
        project_id: ProjectId,
        email: &str,
    ) -> StoreResult<Option<WithPasswordUser>>;

    /// Insert a new account. `AlreadyExists` when (project, email) is taken.
    async fn insert(&self, user: &WithPasswordUser) -> StoreResult<()>;

    /// Swap the stored hash from `expected_hash` to `new_hash`.
    ///
    /// Returns `false`, writing nothing, when the stored hash is no longer
    /// `expected_hash`.
    async fn replace_password(
        &self,
        id: UserId,
        expected_hash: &str,
        new_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool>;
}
