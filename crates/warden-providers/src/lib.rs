//! External identity provider adapters.
//!
//! Google OAuth2 and generic OpenID Connect behind one [`OAuthProvider`]
//! contract, plus the [`ProviderFactory`] that turns a stored
//! [`warden_core::AuthProvider`] into a ready adapter.

pub mod error;
pub mod factory;
pub mod google;
pub mod http;
pub mod identity;
pub mod oidc;
pub mod provider;
pub mod token;

pub use error::{ProviderError, ProviderResult, UpstreamFailure};
pub use factory::{ProviderConstructor, ProviderFactory};
pub use google::{GoogleEndpoints, GoogleProvider};
pub use http::{build_http_client, HttpConfig};
pub use identity::{
    apply_identities, ApplyClaim, AuthIdentity, EmailClaim, IdentityClaim, IdentityType,
    NameClaim, ProfilePicClaim,
};
pub use oidc::{OidcProvider, OidcSettings};
pub use provider::OAuthProvider;
pub use token::AuthToken;
