use std::collections::HashMap;

use async_trait::async_trait;
use sion_application::{RoleRepository, UserRepository};
use sion_core::{AppError, AppResult};
use sion_domain::{EmailAddress, Role, RoleId, UserId, UserRecord};
use tokio::sync::RwLock;

/// In-memory role and user store.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    roles: RwLock<HashMap<RoleId, Role>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryDirectoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryDirectoryRepository {
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(role_id).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(roles)
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        self.roles.write().await.insert(role.id().clone(), role);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectoryRepository {
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.profile().email == email)
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|left, right| left.id().cmp(right.id()));
        Ok(users)
    }

    async fn create_user(&self, user: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users.contains_key(user.id()) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                user.id()
            )));
        }

        users.insert(user.id().clone(), user);
        Ok(())
    }
}
