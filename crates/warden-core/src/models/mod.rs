//! Domain models shared by the store and provider crates.

mod auth_provider;
mod password_user;
mod profile;

pub use auth_provider::{
    AuthProvider, AuthProviderParam, CreateAuthProvider, ProviderType, UnknownProviderTag,
};
pub use password_user::WithPasswordUser;
pub use profile::UserProfile;
