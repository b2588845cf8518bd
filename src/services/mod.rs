//! Business logic services layer

pub mod permission_defs;
pub mod rbac_service;

pub use permission_defs::default_permission_defs;
pub use rbac_service::RbacService;
