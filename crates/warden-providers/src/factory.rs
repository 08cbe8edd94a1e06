//! Maps a provider-type tag to the adapter constructor for it.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use warden_core::{AuthProvider, ProviderType};

use crate::error::{ProviderError, ProviderResult};
use crate::google::GoogleProvider;
use crate::http::{build_http_client, HttpConfig};
use crate::oidc::OidcProvider;
use crate::provider::OAuthProvider;

/// Builds an adapter from a decrypted provider configuration.
pub type ProviderConstructor =
    Arc<dyn Fn(&AuthProvider, &Client) -> ProviderResult<Box<dyn OAuthProvider>> + Send + Sync>;

/// Registry of adapter constructors, injected into the provider service.
#[derive(Clone)]
pub struct ProviderFactory {
    constructors: HashMap<ProviderType, ProviderConstructor>,
    http_client: Client,
}

impl ProviderFactory {
    /// An empty factory. Every build fails until constructors are registered.
    #[must_use]
    pub fn new(http_client: Client) -> Self {
        Self {
            constructors: HashMap::new(),
            http_client,
        }
    }

    /// A factory with the Google and OIDC adapters registered.
    #[must_use]
    pub fn with_defaults(http_config: &HttpConfig) -> Self {
        let mut factory = Self::new(build_http_client(http_config));
        factory.register(ProviderType::Google, Arc::new(build_google));
        factory.register(ProviderType::Oidc, Arc::new(build_oidc));
        factory
    }

    /// Register (or replace) the constructor for `provider_type`.
    pub fn register(&mut self, provider_type: ProviderType, constructor: ProviderConstructor) {
        self.constructors.insert(provider_type, constructor);
    }

    #[must_use]
    pub fn supports(&self, provider_type: ProviderType) -> bool {
        self.constructors.contains_key(&provider_type)
    }

    /// Build the adapter for `config`.
    ///
    /// # Errors
    ///
    /// `UnknownProviderType` when no constructor is registered for the tag.
    /// Password providers never have one: they authenticate locally.
    pub fn build(&self, config: &AuthProvider) -> ProviderResult<Box<dyn OAuthProvider>> {
        let constructor = self
            .constructors
            .get(&config.provider)
            .ok_or_else(|| ProviderError::UnknownProviderType(config.provider.to_string()))?;
        constructor(config, &self.http_client)
    }
}

fn build_google(config: &AuthProvider, client: &Client) -> ProviderResult<Box<dyn OAuthProvider>> {
    Ok(Box::new(GoogleProvider::from_config(config, client.clone())))
}

fn build_oidc(config: &AuthProvider, client: &Client) -> ProviderResult<Box<dyn OAuthProvider>> {
    Ok(Box::new(OidcProvider::from_config(config, client.clone())))
}

impl std::fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.constructors.keys().map(ProviderType::as_str).collect();
        registered.sort_unstable();
        f.debug_struct("ProviderFactory")
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}
