//! The derived nodes of the session graph.

mod identity;
mod membership;
mod permissions;
mod role_flags;

pub use identity::IdentityNode;
pub use membership::MembershipNode;
pub use permissions::PermissionsNode;
pub use role_flags::RoleFlagsNode;
