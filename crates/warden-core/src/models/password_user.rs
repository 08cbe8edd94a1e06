//! Local username/password account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, UserId};
use crate::traits::ProjectScoped;

/// A password account, unique per (email, project).
///
/// `password` only ever holds a one-way hash, and is emptied before the
/// record is handed back to a caller.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithPasswordUser {
    pub id: UserId,
    pub project_id: ProjectId,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WithPasswordUser {
    /// Drop the stored hash so the record is safe to return.
    #[must_use]
    pub fn without_password(mut self) -> Self {
        self.password.clear();
        self
    }
}

impl ProjectScoped for WithPasswordUser {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl std::fmt::Debug for WithPasswordUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithPasswordUser")
            .field("id", &self.id)
            .field("project_id", &self.project_id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
