//! Project scoping traits.
//!
//! # Example
//!
//! ```
//! use warden_core::{ProjectId, ProjectScoped};
//!
//! struct Document {
//!     project_id: ProjectId,
//! }
//!
//! impl ProjectScoped for Document {
//!     fn project_id(&self) -> ProjectId {
//!         self.project_id
//!     }
//! }
//!
//! let project = ProjectId::new();
//! assert!(Document { project_id: project }.belongs_to(project));
//! ```

use crate::ids::ProjectId;

/// Trait for records that belong to exactly one project.
///
/// This trait is object-safe: `&dyn ProjectScoped` works.
pub trait ProjectScoped {
    /// Returns the project owning this record.
    fn project_id(&self) -> ProjectId;

    /// Whether the record belongs to `project`.
    fn belongs_to(&self, project: ProjectId) -> bool {
        self.project_id() == project
    }
}
