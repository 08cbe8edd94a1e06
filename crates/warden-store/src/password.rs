//! Local username/password authentication.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use warden_auth::PasswordHasher;
use warden_core::{ProjectId, UserId, WithPasswordUser};

use crate::error::{StoreError, StoreResult};
use crate::repository::PasswordUserRepository;

/// Signup, login and password rotation for password accounts.
///
/// Every returned user has its password field cleared.
#[async_trait]
pub trait PasswordAuthenticator: Send + Sync {
    /// Create an account. `AlreadyExists` when the email is taken in `project_id`.
    async fn signup(
        &self,
        project_id: ProjectId,
        email: &str,
        password: &str,
    ) -> StoreResult<WithPasswordUser>;

    /// Check credentials. Unknown email, other project and wrong password
    /// all yield `NotFound`.
    async fn login(
        &self,
        project_id: ProjectId,
        email: &str,
        password: &str,
    ) -> StoreResult<WithPasswordUser>;

    /// Replace the password after re-checking the old one.
    ///
    /// The stored hash is swapped only if it is still the one that was
    /// verified; losing that race is a `Conflict`.
    async fn update_password(
        &self,
        project_id: ProjectId,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> StoreResult<()>;
}

/// Emails are matched case-insensitively and without surrounding whitespace.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// [`PasswordAuthenticator`] backed by a repository and Argon2id.
pub struct PasswordService {
    repository: Arc<dyn PasswordUserRepository>,
    hasher: PasswordHasher,
    dummy_hash: OnceLock<Option<String>>,
}

impl PasswordService {
    #[must_use]
    pub fn new(repository: Arc<dyn PasswordUserRepository>, hasher: PasswordHasher) -> Self {
        Self {
            repository,
            hasher,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Look up and verify, returning the user with its hash intact.
    async fn authenticate(
        &self,
        project_id: ProjectId,
        email: &str,
        password: &str,
    ) -> StoreResult<WithPasswordUser> {
        let email = normalize_email(email);

        let Some(user) = self.repository.find_by_email(project_id, &email).await? else {
            // Spend the same work as a real check so a missing email is not
            // distinguishable by timing.
            self.verify_against_dummy(password);
            return Err(StoreError::NotFound);
        };

        match self.hasher.verify(password, &user.password) {
            Ok(true) => Ok(user),
            Ok(false) => Err(StoreError::NotFound),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                Err(StoreError::NotFound)
            }
        }
    }

    fn verify_against_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_init(|| self.hasher.hash("warden-dummy-password").ok());
        if let Some(hash) = dummy {
            let _ = self.hasher.verify(password, hash);
        }
    }

    fn hash(&self, password: &str) -> StoreResult<String> {
        self.hasher
            .hash(password)
            .map_err(|e| StoreError::Hashing(e.to_string()))
    }
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PasswordAuthenticator for PasswordService {
    #[instrument(skip(self, email, password))]
    async fn signup(
        &self,
        project_id: ProjectId,
        email: &str,
        password: &str,
    ) -> StoreResult<WithPasswordUser> {
        let now = Utc::now();
        let user = WithPasswordUser {
            id: UserId::new(),
            project_id,
            email: normalize_email(email),
            password: self.hash(password)?,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&user).await?;

        tracing::info!(user_id = %user.id, project_id = %project_id, "Password account created");

        Ok(user.without_password())
    }

    #[instrument(skip(self, email, password))]
    async fn login(
        &self,
        project_id: ProjectId,
        email: &str,
        password: &str,
    ) -> StoreResult<WithPasswordUser> {
        let user = self.authenticate(project_id, email, password).await?;
        Ok(user.without_password())
    }

    #[instrument(skip(self, email, old_password, new_password))]
    async fn update_password(
        &self,
        project_id: ProjectId,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> StoreResult<()> {
        let user = self.authenticate(project_id, email, old_password).await?;
        let new_hash = self.hash(new_password)?;

        let swapped = self
            .repository
            .replace_password(user.id, &user.password, &new_hash, Utc::now())
            .await?;
        if !swapped {
            return Err(StoreError::Conflict(format!("password of user {}", user.id)));
        }

        tracing::info!(user_id = %user.id, project_id = %project_id, "Password changed");

        Ok(())
    }
}
