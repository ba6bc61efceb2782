use std::sync::Arc;

use crate::RoleRepository;

/// Maintains the role collection: catalog seeding and listing.
#[derive(Clone)]
pub struct RoleService {
    role_repository: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(role_repository: Arc<dyn RoleRepository>) -> Self {
        Self { role_repository }
    }
}

mod catalog;
mod listing;
mod seed;

pub use catalog::default_role_catalog;
pub use seed::RoleSeedReport;
