//! Shared fixtures for store and service integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use warden_auth::{generate_master_key, AesGcmVault, AuthError, AuthResult, CredentialVault};
use warden_core::{
    AuthProvider, AuthProviderParam, CreateAuthProvider, ProjectAccess, ProjectId, ProviderId,
    ProviderType, UserId,
};
use warden_providers::{HttpConfig, ProviderFactory};
use warden_store::{
    AuthProviderRepository, AuthProviderService, AuthProviderStore,
    InMemoryAuthProviderRepository, ProviderFilter, ProviderUpdate, StoreResult,
};

static INIT: Once = Once::new();

/// Install a test subscriber when `RUST_LOG` is set.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        }
    });
}

/// Vault whose failures can be switched on per test.
pub struct FlakyVault {
    inner: AesGcmVault,
    pub fail_decrypt: AtomicBool,
}

/// Plaintext that [`FlakyVault`] refuses to encrypt.
pub const POISON: &str = "poison";

impl FlakyVault {
    pub fn new() -> Self {
        Self {
            inner: AesGcmVault::new(generate_master_key()),
            fail_decrypt: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CredentialVault for FlakyVault {
    async fn encrypt(&self, project_id: ProjectId, plaintext: &str) -> AuthResult<String> {
        if plaintext == POISON {
            return Err(AuthError::EncryptionFailed("vault rejected value".to_string()));
        }
        self.inner.encrypt(project_id, plaintext).await
    }

    async fn decrypt(&self, project_id: ProjectId, ciphertext: &str) -> AuthResult<String> {
        if self.fail_decrypt.load(Ordering::SeqCst) {
            return Err(AuthError::DecryptionFailed("vault unavailable".to_string()));
        }
        self.inner.decrypt(project_id, ciphertext).await
    }
}

/// Repository that moves the record to another project right before the
/// `move_on_read`-th lookup (zero-based), as a concurrent writer would.
pub struct RelocatingRepository {
    pub inner: Arc<InMemoryAuthProviderRepository>,
    pub destination: ProjectId,
    pub move_on_read: usize,
    reads: AtomicUsize,
}

impl RelocatingRepository {
    pub fn new(destination: ProjectId, move_on_read: usize) -> Self {
        Self {
            inner: Arc::new(InMemoryAuthProviderRepository::new()),
            destination,
            move_on_read,
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthProviderRepository for RelocatingRepository {
    async fn find_by_id(&self, id: ProviderId) -> StoreResult<Option<AuthProvider>> {
        if self.reads.fetch_add(1, Ordering::SeqCst) == self.move_on_read {
            if let Some(mut record) = self.inner.find_by_id(id).await? {
                record.project_id = self.destination;
                self.inner.put_raw(record);
            }
        }
        self.inner.find_by_id(id).await
    }

    async fn find(&self, filter: &ProviderFilter) -> StoreResult<Vec<AuthProvider>> {
        self.inner.find(filter).await
    }

    async fn insert(&self, record: &AuthProvider) -> StoreResult<()> {
        self.inner.insert(record).await
    }

    async fn update(
        &self,
        id: ProviderId,
        expected_project: ProjectId,
        update: &ProviderUpdate,
    ) -> StoreResult<Option<AuthProvider>> {
        self.inner.update(id, expected_project, update).await
    }
}

/// Service over a [`RelocatingRepository`] that moves records to
/// `destination` between the authorization check and the write.
pub fn relocating_service(destination: ProjectId) -> (AuthProviderService, Arc<RelocatingRepository>) {
    init_test_logging();
    let repository = Arc::new(RelocatingRepository::new(destination, 1));
    let vault = Arc::new(AesGcmVault::new(generate_master_key()));
    let store = AuthProviderStore::new(repository.clone(), vault);
    let service = AuthProviderService::new(store, ProviderFactory::with_defaults(&HttpConfig::default()));
    (service, repository)
}

pub struct Harness {
    pub service: AuthProviderService,
    pub repository: Arc<InMemoryAuthProviderRepository>,
    pub vault: Arc<FlakyVault>,
}

pub fn harness() -> Harness {
    init_test_logging();
    let repository = Arc::new(InMemoryAuthProviderRepository::new());
    let vault = Arc::new(FlakyVault::new());
    let store = AuthProviderStore::new(repository.clone(), vault.clone());
    let service = AuthProviderService::new(store, ProviderFactory::with_defaults(&HttpConfig::default()));
    Harness {
        service,
        repository,
        vault,
    }
}

/// A caller authorized for exactly `projects`.
pub fn caller(projects: &[ProjectId]) -> ProjectAccess {
    ProjectAccess::new(UserId::new(), projects.iter().copied())
}

pub fn google_input(project_id: ProjectId) -> CreateAuthProvider {
    CreateAuthProvider {
        name: "Google".to_string(),
        icon: "google.svg".to_string(),
        provider: ProviderType::Google,
        project_id,
        params: vec![
            AuthProviderParam::plain("GOOGLE_CLIENT_ID", "x").with_label("Client ID"),
            AuthProviderParam::secret("GOOGLE_CLIENT_SECRET", "y").with_label("Client secret"),
            AuthProviderParam::plain("GOOGLE_REDIRECT_URL", "https://app.example.com/cb"),
        ],
    }
}
