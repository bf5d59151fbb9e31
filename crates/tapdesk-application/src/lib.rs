//! Application layer for TapDesk.
//!
//! This crate hosts the session/permission resolution graph and the use
//! cases that feed it: authentication and the LeanCloud app lookup.

pub mod auth_usecase;
pub mod graph;
pub mod lean_cloud_app_service;
pub mod nodes;
pub mod session_graph;
pub mod session_store;

pub use auth_usecase::AuthUseCase;
pub use graph::{Loadable, NodeId, Subscription};
pub use lean_cloud_app_service::LeanCloudAppService;
pub use session_graph::SessionGraph;
