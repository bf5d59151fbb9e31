pub mod access;
pub mod apps;
pub mod config;
pub mod context;
pub mod session;
