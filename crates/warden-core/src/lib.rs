//! warden Core Library
//!
//! Shared types and traits for warden.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (ProjectId, UserId, ProviderId)
//! - [`traits`] - Project scoping (ProjectScoped)
//! - [`access`] - Caller authorization context (ProjectAccess)
//! - [`models`] - Provider configuration, password accounts, user profiles
//!
//! # Example
//!
//! ```
//! use warden_core::{ProjectAccess, ProjectId, UserId};
//!
//! let project = ProjectId::new();
//! let access = ProjectAccess::new(UserId::new(), [project]);
//! assert!(access.allows(project));
//! ```

pub mod access;
pub mod ids;
pub mod models;
pub mod traits;

pub use access::ProjectAccess;
pub use ids::{ParseIdError, ProjectId, ProviderId, UserId};
pub use models::{
    AuthProvider, AuthProviderParam, CreateAuthProvider, ProviderType, UnknownProviderTag,
    UserProfile, WithPasswordUser,
};
pub use traits::ProjectScoped;
