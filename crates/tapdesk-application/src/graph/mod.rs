//! Dependency graph evaluator.
//!
//! A small, fixed graph of named nodes: one source node holding the session
//! and derived nodes computed asynchronously from their upstream values.
//!
//! # Module Structure
//!
//! - `node`: `NodeId` and the declared edges (`DependencyGraph`)
//! - `derived`: `DerivedNode`, the compute contract of derived nodes
//! - `memo`: `Memo`, the generation-tagged cache of one node
//! - `loadable`: `Loadable` states and `Subscription` views

mod derived;
mod loadable;
mod memo;
mod node;

pub use derived::DerivedNode;
pub use loadable::{Loadable, Subscription};
pub use memo::Memo;
pub use node::{DependencyGraph, NodeId};
