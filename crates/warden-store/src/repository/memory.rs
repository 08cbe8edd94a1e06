//! In-memory repositories, used when no database is configured and in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use warden_core::{AuthProvider, ProjectId, ProviderId, UserId, WithPasswordUser};

use super::{AuthProviderRepository, PasswordUserRepository, ProviderFilter, ProviderUpdate};
use crate::error::{StoreError, StoreResult};

/// In-memory implementation of [`AuthProviderRepository`].
#[derive(Debug, Default)]
pub struct InMemoryAuthProviderRepository {
    records: RwLock<HashMap<ProviderId, AuthProvider>>,
}

impl InMemoryAuthProviderRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a record as-is, bypassing all checks (for testing).
    pub fn put_raw(&self, record: AuthProvider) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.id, record);
    }
}

#[async_trait]
impl AuthProviderRepository for InMemoryAuthProviderRepository {
    async fn find_by_id(&self, id: ProviderId) -> StoreResult<Option<AuthProvider>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned())
    }

    async fn find(&self, filter: &ProviderFilter) -> StoreResult<Vec<AuthProvider>> {
        let mut found: Vec<AuthProvider> = self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn insert(&self, record: &AuthProvider) -> StoreResult<()> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists);
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: ProviderId,
        expected_project: ProjectId,
        update: &ProviderUpdate,
    ) -> StoreResult<Option<AuthProvider>> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.get_mut(&id) {
            Some(record) if record.project_id == expected_project => {
                update.apply_to(record);
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }
}

/// In-memory implementation of [`PasswordUserRepository`].
#[derive(Debug, Default)]
pub struct InMemoryPasswordUserRepository {
    users: RwLock<HashMap<(ProjectId, String), WithPasswordUser>>,
}

impl InMemoryPasswordUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PasswordUserRepository for InMemoryPasswordUserRepository {
    async fn find_by_email(
        &self,
        project_id: ProjectId,
        email: &str,
    ) -> StoreResult<Option<WithPasswordUser>> {
        Ok(self
            .users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(project_id, email.to_string()))
            .cloned())
    }

    async fn insert(&self, user: &WithPasswordUser) -> StoreResult<()> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        let key = (user.project_id, user.email.clone());
        if users.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }
        users.insert(key, user.clone());
        Ok(())
    }

    async fn replace_password(
        &self,
        id: UserId,
        expected_hash: &str,
        new_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        match users.values_mut().find(|u| u.id == id) {
            Some(user) if user.password == expected_hash => {
                user.password = new_hash.to_string();
                user.updated_at = updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
