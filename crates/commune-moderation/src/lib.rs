//! # commune-moderation
//!
//! The authority layer of Commune: reconciles the named permission vector
//! with the protocol's single power-level trust scalar, and executes
//! moderation actions through opaque remote collaborators.
//!
//! - [`validator::PermissionValidator`] — required-level computation and
//!   dependency/conflict detection over the permission catalog.
//! - [`templates::TemplateEngine`] — curated permission bundles with
//!   recommended power levels.
//! - [`resolver::RoleAssignmentResolver`] — authority-checked role changes,
//!   including the two-phase ownership transfer.
//! - [`bulk::BulkModerationOrchestrator`] — concurrent kick/ban/unban with
//!   per-target failure isolation.
//! - [`ports`] — the membership store and moderation transport boundaries.

pub mod bulk;
pub mod ports;
pub mod resolver;
pub mod templates;
pub mod validator;

pub use bulk::{BulkActionKind, BulkActionRequest, BulkActionResult, BulkModerationOrchestrator};
pub use ports::{MembershipStore, ModerationTransport};
pub use resolver::{AssignmentOutcome, OwnershipTransfer, RoleAssignmentResolver};
pub use templates::{PermissionTemplate, TemplateApplication, TemplateEngine};
pub use validator::{PermissionValidator, ValidationReport};
