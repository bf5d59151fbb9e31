pub mod config_service;
pub mod leancloud;
pub mod paths;
pub mod session_token_store;

pub use crate::config_service::ConfigService;
pub use crate::leancloud::LeanCloudClient;
pub use crate::paths::DeskPaths;
pub use crate::session_token_store::SessionTokenStore;
