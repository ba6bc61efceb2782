use sion_core::AppResult;
use sion_domain::Role;

use super::RoleService;

impl RoleService {
    /// Lists stored roles ordered by id.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.role_repository.list_roles().await?;
        roles.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(roles)
    }
}
