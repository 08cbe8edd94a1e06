//! Strongly Typed Identifiers
//!
//! Newtype wrappers around [`Uuid`] so a project id can never be passed
//! where a provider id is expected.
//!
//! # Example
//!
//! ```
//! use warden_core::{ProjectId, ProviderId};
//!
//! let project = ProjectId::new();
//! let provider = ProviderId::new();
//!
//! fn requires_project(id: ProjectId) -> String {
//!     id.to_string()
//! }
//!
//! let result = requires_project(project);
//! // requires_project(provider); // This would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying UUID parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(
    /// Identifier of a project, the tenant boundary for provider configuration.
    ///
    /// ```
    /// use warden_core::ProjectId;
    ///
    /// let project: ProjectId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
    /// assert_eq!(project.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    /// ```
    ProjectId
);

define_id!(
    /// Identifier of a user acting on the platform (audit `created_by` / `updated_by`).
    UserId
);

define_id!(
    /// Identifier of a stored auth provider configuration.
    ProviderId
);
