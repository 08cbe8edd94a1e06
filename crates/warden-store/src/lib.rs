//! Auth provider persistence and orchestration for warden.
//!
//! - [`store::AuthProviderStore`] applies the credential vault to secret
//!   params on every write and read
//! - [`service::AuthProviderService`] adds project scoping and builds
//!   provider adapters
//! - [`password::PasswordService`] handles local password accounts
//! - [`Warden`] wires everything from a [`config::WardenConfig`]

pub mod config;
pub mod error;
pub mod password;
pub mod repository;
pub mod service;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use warden_auth::CredentialVault;
use warden_providers::ProviderFactory;

pub use config::{AppEnvironment, Argon2Settings, ConfigError, WardenConfig};
pub use error::{StoreError, StoreResult};
pub use password::{normalize_email, PasswordAuthenticator, PasswordService};
pub use repository::{
    AuthProviderRepository, InMemoryAuthProviderRepository, InMemoryPasswordUserRepository,
    PasswordUserRepository, PgAuthProviderRepository, PgPasswordUserRepository, ProviderFilter,
    ProviderUpdate,
};
pub use service::AuthProviderService;
pub use store::AuthProviderStore;

/// The assembled services.
#[derive(Debug, Clone)]
pub struct Warden {
    pub providers: AuthProviderService,
    pub passwords: Arc<PasswordService>,
}

impl Warden {
    /// Wire vault, repositories, factory and services from configuration.
    ///
    /// Uses PostgreSQL when a database URL is configured, in-memory
    /// repositories otherwise.
    pub async fn from_config(config: &WardenConfig) -> StoreResult<Self> {
        let vault: Arc<dyn CredentialVault> = Arc::new(config.vault.clone());
        let factory = ProviderFactory::with_defaults(&config.http);

        let (providers, users): (
            Arc<dyn AuthProviderRepository>,
            Arc<dyn PasswordUserRepository>,
        ) = match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect(url)
                    .await?;
                tracing::info!("Database connection established");
                (
                    Arc::new(PgAuthProviderRepository::new(pool.clone())),
                    Arc::new(PgPasswordUserRepository::new(pool)),
                )
            }
            None => {
                tracing::info!("No database configured, using in-memory repositories");
                (
                    Arc::new(InMemoryAuthProviderRepository::new()),
                    Arc::new(InMemoryPasswordUserRepository::new()),
                )
            }
        };

        let hasher = config
            .argon2
            .hasher()
            .map_err(|e| StoreError::Hashing(e.to_string()))?;

        Ok(Self {
            providers: AuthProviderService::new(AuthProviderStore::new(providers, vault), factory),
            passwords: Arc::new(PasswordService::new(users, hasher)),
        })
    }
}
