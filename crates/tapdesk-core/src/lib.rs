//! Domain layer of the TapDesk console client.
//!
//! Holds the session and directory models, the permission fold, the shared
//! error type and the interfaces of the hosted-backend collaborators.

pub mod backend;
pub mod cloud;
pub mod config;
pub mod error;
pub mod group;
pub mod permission;
pub mod role;
pub mod session;

// Re-export common types
pub use error::{DeskError, Result};
pub use group::Group;
pub use permission::{PartialPermissions, Permissions};
pub use role::{Role, RoleFlags, SystemRole};
pub use session::{CurrentUser, Session, SessionUser};
