mod audit;
mod inputs;
mod repositories;

pub use audit::{AccessAuditEvent, AccessAuditRepository};
pub use inputs::CreateUserInput;
pub use repositories::{RoleRepository, UserRepository};
