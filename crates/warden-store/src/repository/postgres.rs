//! PostgreSQL repositories (schema in `migrations/`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use warden_core::{
    AuthProvider, AuthProviderParam, ProjectId, ProviderId, ProviderType, UserId, WithPasswordUser,
};

use super::{AuthProviderRepository, PasswordUserRepository, ProviderFilter, ProviderUpdate};
use crate::error::{StoreError, StoreResult};

/// Row of `auth_providers`.
#[derive(Debug, FromRow)]
struct AuthProviderRow {
    id: Uuid,
    name: String,
    icon: String,
    provider: String,
    project_id: Uuid,
    params: Json<Vec<AuthProviderParam>>,
    enabled: bool,
    created_at: DateTime<Utc>,
    created_by: Uuid,
    updated_at: DateTime<Utc>,
    updated_by: Uuid,
}

impl TryFrom<AuthProviderRow> for AuthProvider {
    type Error = StoreError;

    fn try_from(row: AuthProviderRow) -> Result<Self, Self::Error> {
        let provider: ProviderType = row
            .provider
            .parse()
            .map_err(|e| StoreError::InvalidRecord(format!("auth provider {}: {e}", row.id)))?;

        Ok(AuthProvider {
            id: ProviderId::from_uuid(row.id),
            name: row.name,
            icon: row.icon,
            provider,
            project_id: ProjectId::from_uuid(row.project_id),
            params: row.params.0,
            enabled: row.enabled,
            created_at: row.created_at,
            created_by: UserId::from_uuid(row.created_by),
            updated_at: row.updated_at,
            updated_by: UserId::from_uuid(row.updated_by),
        })
    }
}

/// PostgreSQL implementation of [`AuthProviderRepository`].
#[derive(Debug, Clone)]
pub struct PgAuthProviderRepository {
    pool: PgPool,
}

impl PgAuthProviderRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthProviderRepository for PgAuthProviderRepository {
    async fn find_by_id(&self, id: ProviderId) -> StoreResult<Option<AuthProvider>> {
        let row: Option<AuthProviderRow> =
            sqlx::query_as("SELECT * FROM auth_providers WHERE id = $1")
                .bind(*id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(AuthProvider::try_from).transpose()
    }

    async fn find(&self, filter: &ProviderFilter) -> StoreResult<Vec<AuthProvider>> {
        let projects: Option<Vec<Uuid>> = filter
            .projects
            .as_ref()
            .map(|p| p.iter().map(|id| *id.as_uuid()).collect());

        let rows: Vec<AuthProviderRow> = sqlx::query_as(
            r"
            SELECT * FROM auth_providers
            WHERE ($1::uuid[] IS NULL OR project_id = ANY($1))
              AND ($2::boolean IS NULL OR enabled = $2)
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(projects)
        .bind(filter.enabled)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AuthProvider::try_from).collect()
    }

    async fn insert(&self, record: &AuthProvider) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO auth_providers (
                id, name, icon, provider, project_id, params, enabled,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(*record.id.as_uuid())
        .bind(&record.name)
        .bind(&record.icon)
        .bind(record.provider.as_str())
        .bind(*record.project_id.as_uuid())
        .bind(Json(&record.params))
        .bind(record.enabled)
        .bind(record.created_at)
        .bind(*record.created_by.as_uuid())
        .bind(record.updated_at)
        .bind(*record.updated_by.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_insert)?;

        Ok(())
    }

    async fn update(
        &self,
        id: ProviderId,
        expected_project: ProjectId,
        update: &ProviderUpdate,
    ) -> StoreResult<Option<AuthProvider>> {
        let row: Option<AuthProviderRow> = sqlx::query_as(
            r"
            UPDATE auth_providers
            SET
                name = COALESCE($3, name),
                icon = COALESCE($4, icon),
                provider = COALESCE($5, provider),
                project_id = COALESCE($6, project_id),
                params = COALESCE($7, params),
                enabled = COALESCE($8, enabled),
                updated_at = $9,
                updated_by = $10
            WHERE id = $1 AND project_id = $2
            RETURNING *
            ",
        )
        .bind(*id.as_uuid())
        .bind(*expected_project.as_uuid())
        .bind(&update.name)
        .bind(&update.icon)
        .bind(update.provider.map(|p| p.as_str()))
        .bind(update.project_id.map(|p| *p.as_uuid()))
        .bind(update.params.as_ref().map(Json))
        .bind(update.enabled)
        .bind(update.updated_at)
        .bind(*update.updated_by.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AuthProvider::try_from).transpose()
    }
}

/// Row of `password_users`.
#[derive(Debug, FromRow)]
struct PasswordUserRow {
    id: Uuid,
    project_id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PasswordUserRow> for WithPasswordUser {
    fn from(row: PasswordUserRow) -> Self {
        WithPasswordUser {
            id: UserId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            email: row.email,
            password: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of [`PasswordUserRepository`].
#[derive(Debug, Clone)]
pub struct PgPasswordUserRepository {
    pool: PgPool,
}

impl PgPasswordUserRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordUserRepository for PgPasswordUserRepository {
    async fn find_by_email(
        &self,
        project_id: ProjectId,
        email: &str,
    ) -> StoreResult<Option<WithPasswordUser>> {
        let row: Option<PasswordUserRow> =
            sqlx::query_as("SELECT * FROM password_users WHERE project_id = $1 AND email = $2")
                .bind(*project_id.as_uuid())
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(WithPasswordUser::from))
    }

    async fn insert(&self, user: &WithPasswordUser) -> StoreResult<()> {
        sqlx::query(
            r"
            INSERT INTO password_users (id, project_id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(*user.id.as_uuid())
        .bind(*user.project_id.as_uuid())
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_insert)?;

        Ok(())
    }

    async fn replace_password(
        &self,
        id: UserId,
        expected_hash: &str,
        new_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE password_users
            SET password_hash = $3, updated_at = $4
            WHERE id = $1 AND password_hash = $2
            ",
        )
        .bind(*id.as_uuid())
        .bind(expected_hash)
        .bind(new_hash)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
