//! Caller authorization context.
//!
//! The calling layer resolves which projects the current caller may act on
//! and hands the result to the services as a [`ProjectAccess`].

use std::collections::HashSet;

use crate::ids::{ProjectId, UserId};
use crate::traits::ProjectScoped;

/// The set of projects a caller is authorized for, plus who the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAccess {
    actor: UserId,
    projects: HashSet<ProjectId>,
}

impl ProjectAccess {
    /// Build an access context for `actor` over `projects`.
    pub fn new(actor: UserId, projects: impl IntoIterator<Item = ProjectId>) -> Self {
        Self {
            actor,
            projects: projects.into_iter().collect(),
        }
    }

    /// The user on whose behalf the call is made.
    #[must_use]
    pub fn actor(&self) -> UserId {
        self.actor
    }

    /// Whether the caller may act on `project`.
    #[must_use]
    pub fn allows(&self, project: ProjectId) -> bool {
        self.projects.contains(&project)
    }

    /// Whether the caller may see `record`.
    pub fn can_access<T: ProjectScoped + ?Sized>(&self, record: &T) -> bool {
        self.allows(record.project_id())
    }

    /// Authorized projects, in no particular order.
    pub fn projects(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.projects.iter().copied()
    }

    /// Number of authorized projects.
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}
