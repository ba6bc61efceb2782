//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod deadline;
mod directory_ports;
mod permission_resolver;
mod role_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use authorization_service::AuthorizationService;
pub use deadline::Deadline;
pub use directory_ports::{
    AccessAuditEvent, AccessAuditRepository, CreateUserInput, RoleRepository, UserRepository,
};
pub use permission_resolver::PermissionResolver;
pub use role_service::{RoleSeedReport, RoleService, default_role_catalog};
pub use user_service::UserService;
