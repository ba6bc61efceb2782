use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use sion_core::{AppError, AppResult};
use sion_domain::{AccessDecision, Permission, UserId};
use tracing::{info, warn};

use crate::{AccessAuditEvent, AccessAuditRepository, PermissionResolver, UserRepository};

/// Application service for user-level permission checks.
#[derive(Clone)]
pub struct AuthorizationService {
    resolver: PermissionResolver,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AccessAuditRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        resolver: PermissionResolver,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AccessAuditRepository>,
    ) -> Self {
        Self {
            resolver,
            user_repository,
            audit_repository,
        }
    }

    /// Returns the union of permissions granted through every role of a user.
    ///
    /// A user without role references resolves to the empty set. A missing
    /// role anywhere in any chain aborts the whole lookup.
    pub async fn get_user_permissions(&self, user_id: &UserId) -> AppResult<BTreeSet<Permission>> {
        let user = self
            .user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

        let mut resolved_roles = HashSet::new();
        let mut permissions = BTreeSet::new();

        for role_id in user.role_ids() {
            if !resolved_roles.insert(role_id) {
                continue;
            }

            permissions.extend(self.resolver.resolve_permissions(role_id).await?);
        }

        Ok(permissions)
    }

    /// Returns whether the user currently holds the permission.
    ///
    /// Every completed check is logged and appended to the access audit trail.
    pub async fn check_permission(
        &self,
        user_id: &UserId,
        permission: &Permission,
    ) -> AppResult<bool> {
        let permissions = self.get_user_permissions(user_id).await?;
        let decision = AccessDecision::from_membership(permissions.contains(permission));

        match decision {
            AccessDecision::Granted => info!(
                user_id = %user_id,
                permission = %permission,
                decision = decision.as_str(),
                "permission granted"
            ),
            AccessDecision::Denied => warn!(
                user_id = %user_id,
                permission = %permission,
                decision = decision.as_str(),
                "permission denied"
            ),
        }

        self.audit_repository
            .append_event(AccessAuditEvent {
                user_id: user_id.clone(),
                permission: permission.clone(),
                decision,
                occurred_at: Utc::now(),
            })
            .await?;

        Ok(decision.is_granted())
    }

    /// Ensures the user holds the permission.
    pub async fn require_permission(
        &self,
        user_id: &UserId,
        permission: &Permission,
    ) -> AppResult<()> {
        if self.check_permission(user_id, permission).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{user_id}' is missing permission '{permission}'"
        )))
    }
}
