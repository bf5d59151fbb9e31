//! Role domain module.
//!
//! Backend roles come in two kinds: a fixed set of built-in system roles
//! (`SystemRole`) and user-defined roles that back support groups.
//!
//! # Module Structure
//!
//! - `model`: `Role`, `SystemRole`, `RoleFlags`
//! - `query`: `RoleQuery` filters understood by the directory backend

mod model;
mod query;

// Re-export public API
pub use model::{Role, RoleFlags, SystemRole};
pub use query::{NameFilter, RoleQuery};
