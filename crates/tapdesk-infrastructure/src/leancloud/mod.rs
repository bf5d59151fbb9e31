//! LeanCloud REST backend.

mod client;
pub mod dto;
pub mod where_clause;

pub use client::LeanCloudClient;
