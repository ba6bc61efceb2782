use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use sion_core::{AppError, AppResult};
use sion_domain::{Permission, Role, RoleId};
use tracing::debug;

use crate::RoleRepository;

/// Resolves the effective permissions of a role across its inheritance chain.
///
/// Roles are fetched one at a time, following `inherits_from` links from the
/// starting role until a role without a parent is reached.
#[derive(Clone)]
pub struct PermissionResolver {
    role_repository: Arc<dyn RoleRepository>,
}

impl PermissionResolver {
    /// Creates a resolver reading roles from the provided repository.
    #[must_use]
    pub fn new(role_repository: Arc<dyn RoleRepository>) -> Self {
        Self { role_repository }
    }

    /// Returns the inheritance chain starting at `role_id`, start role first.
    ///
    /// Fails with [`AppError::NotFound`] when any role in the chain is missing
    /// and with [`AppError::InheritanceCycle`] when a link points back to a
    /// role already visited.
    pub async fn resolve_chain(&self, role_id: &RoleId) -> AppResult<Vec<Role>> {
        let mut chain: Vec<Role> = Vec::new();
        let mut visited: HashSet<RoleId> = HashSet::new();
        let mut next = Some(role_id.clone());

        while let Some(current) = next {
            if !visited.insert(current.clone()) {
                return Err(AppError::InheritanceCycle(cycle_path(&chain, &current)));
            }

            let role = self
                .role_repository
                .find_role(&current)
                .await?
                .ok_or_else(|| missing_role(&current, chain.last()))?;

            next = role.inherits_from().cloned();
            chain.push(role);
        }

        Ok(chain)
    }

    /// Returns the union of permissions declared along the inheritance chain.
    pub async fn resolve_permissions(&self, role_id: &RoleId) -> AppResult<BTreeSet<Permission>> {
        let chain = self.resolve_chain(role_id).await?;
        let permissions: BTreeSet<Permission> = chain
            .iter()
            .flat_map(|role| role.permissions().iter().cloned())
            .collect();

        debug!(
            role_id = %role_id,
            chain_length = chain.len(),
            permission_count = permissions.len(),
            "resolved role permissions"
        );

        Ok(permissions)
    }
}

fn missing_role(role_id: &RoleId, referenced_by: Option<&Role>) -> AppError {
    match referenced_by {
        Some(child) => AppError::NotFound(format!(
            "role '{role_id}' inherited by '{}' does not exist",
            child.id()
        )),
        None => AppError::NotFound(format!("role '{role_id}' does not exist")),
    }
}

fn cycle_path(chain: &[Role], repeated: &RoleId) -> String {
    let start = chain
        .iter()
        .position(|role| role.id() == repeated)
        .unwrap_or_default();

    chain[start..]
        .iter()
        .map(|role| role.id().as_str())
        .chain(std::iter::once(repeated.as_str()))
        .collect::<Vec<_>>()
        .join(" -> ")
}
