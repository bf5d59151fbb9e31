//! Session domain module.
//!
//! This module contains the raw authenticated session handed over by the
//! authentication collaborator and the lightweight identity projected from it.
//!
//! # Module Structure
//!
//! - `model`: `Session`, `SessionUser` and the `CurrentUser` projection
//!
//! # Usage
//!
//! ```ignore
//! use tapdesk_core::session::{CurrentUser, Session, SessionUser};
//! ```

mod model;

// Re-export public API
pub use model::{CurrentUser, Session, SessionUser};
