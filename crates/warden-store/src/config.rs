//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `WARDEN_VAULT_KEY` | required, base64 of 32 bytes |
//! | `WARDEN_DATABASE_URL` | unset: in-memory repositories |
//! | `WARDEN_HTTP_TIMEOUT_SECS` | 10 |
//! | `WARDEN_ARGON2_MEMORY_KIB` | 19456 |
//! | `WARDEN_ARGON2_ITERATIONS` | 2 |
//! | `WARDEN_ARGON2_PARALLELISM` | 1 |
//! | `APP_ENV` | development |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use warden_auth::{AesGcmVault, PasswordHasher};
use warden_providers::HttpConfig;

/// All-zero development key. Refused when `APP_ENV=production`.
pub const INSECURE_VAULT_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("{0} uses the insecure development default; refusing to start in production")]
    InsecureDefault(String),
}

/// Application environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse an `APP_ENV` value. Unrecognized values fall back to development.
    #[must_use]
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(value = other, "Unrecognized APP_ENV value, defaulting to Development");
                Self::Development
            }
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        *self == Self::Production
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Settings {
    /// Build the hasher these settings describe.
    pub fn hasher(&self) -> Result<PasswordHasher, warden_auth::AuthError> {
        PasswordHasher::with_params(self.memory_kib, self.iterations, self.parallelism)
    }
}

/// Complete runtime configuration.
#[derive(Clone)]
pub struct WardenConfig {
    pub app_env: AppEnvironment,
    pub vault: AesGcmVault,
    pub database_url: Option<String>,
    pub http: HttpConfig,
    pub argon2: Argon2Settings,
}

impl std::fmt::Debug for WardenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardenConfig")
            .field("app_env", &self.app_env)
            .field("vault", &self.vault)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("http", &self.http)
            .field("argon2", &self.argon2)
            .finish()
    }
}

impl WardenConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = AppEnvironment::from_env_str(
            &lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
        );

        let vault_key = lookup("WARDEN_VAULT_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("WARDEN_VAULT_KEY".to_string()))?;
        let vault = AesGcmVault::from_base64(vault_key.trim()).map_err(|e| {
            ConfigError::InvalidValue {
                var: "WARDEN_VAULT_KEY".to_string(),
                message: e.to_string(),
            }
        })?;

        if vault.has_insecure_key() {
            if app_env.is_production() {
                return Err(ConfigError::InsecureDefault("WARDEN_VAULT_KEY".to_string()));
            }
            tracing::warn!("WARDEN_VAULT_KEY is the insecure development default");
        }

        let database_url = lookup("WARDEN_DATABASE_URL").filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 = parse_or(&lookup, "WARDEN_HTTP_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WARDEN_HTTP_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        let http = HttpConfig {
            request_timeout: Duration::from_secs(timeout_secs),
            ..HttpConfig::default()
        };

        let defaults = Argon2Settings::default();
        let argon2 = Argon2Settings {
            memory_kib: parse_or(&lookup, "WARDEN_ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "WARDEN_ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "WARDEN_ARGON2_PARALLELISM", defaults.parallelism)?,
        };
        argon2.hasher().map_err(|e| ConfigError::InvalidValue {
            var: "WARDEN_ARGON2_*".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            app_env,
            vault,
            database_url,
            http,
            argon2,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                var: var.to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
