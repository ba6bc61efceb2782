use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sion_core::{AppError, AppResult, NonEmptyString};
use sion_domain::{
    EmailAddress, Permission, RecordStamps, Role, RoleId, UserId, UserProfile, UserRecord,
    UserStatus,
};
use tokio::sync::Mutex;

use crate::{AccessAuditEvent, AccessAuditRepository, RoleRepository, UserRepository};

pub(crate) fn role_id(value: &str) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn user_id(value: &str) -> UserId {
    UserId::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn permission(value: &str) -> Permission {
    Permission::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn role(id: &str, permissions: &[&str], inherits_from: Option<&str>) -> Role {
    named_role(id, id, permissions, inherits_from)
}

pub(crate) fn named_role(
    id: &str,
    name: &str,
    permissions: &[&str],
    inherits_from: Option<&str>,
) -> Role {
    Role::new(
        role_id(id),
        name,
        permissions.iter().map(|value| permission(value)),
        inherits_from.map(role_id),
    )
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn user(id: &str, role_ids: &[&str]) -> UserRecord {
    UserRecord::new(
        user_id(id),
        UserProfile {
            name: NonEmptyString::new(id).unwrap_or_else(|_| unreachable!()),
            last_name: None,
            display_name: None,
            email: EmailAddress::new(format!("{id}@sion.example"))
                .unwrap_or_else(|_| unreachable!()),
            phone: None,
            avatar: None,
            address: None,
        },
        UserStatus::Active,
        role_ids.iter().map(|value| role_id(value)).collect(),
        RecordStamps::default(),
    )
}

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<HashMap<RoleId, Role>>,
    pub(crate) lookups: Mutex<Vec<RoleId>>,
    pub(crate) saves: Mutex<Vec<RoleId>>,
    pub(crate) lookup_delay: Option<Duration>,
}

impl FakeRoleRepository {
    pub(crate) fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: Mutex::new(
                roles
                    .into_iter()
                    .map(|role| (role.id().clone(), role))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }

        self.lookups.lock().await.push(role_id.clone());
        Ok(self.roles.lock().await.get(role_id).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.values().cloned().collect())
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        self.saves.lock().await.push(role.id().clone());
        self.roles.lock().await.insert(role.id().clone(), role);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<HashMap<UserId, UserRecord>>,
}

impl FakeUserRepository {
    pub(crate) fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: Mutex::new(
                users
                    .into_iter()
                    .map(|user| (user.id().clone(), user))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| &user.profile().email == email)
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn create_user(&self, user: UserRecord) -> AppResult<()> {
        let mut users = self.users.lock().await;
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

#[derive(Default)]
pub(crate) struct FakeAccessAuditRepository {
    pub(crate) events: Mutex<Vec<AccessAuditEvent>>,
}

#[async_trait]
impl AccessAuditRepository for FakeAccessAuditRepository {
    async fn append_event(&self, event: AccessAuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// The six roles the admin client ships with.
pub(crate) fn seeded_roles() -> Vec<Role> {
    vec![
        named_role(
            "pastorGeneral",
            "Pastor General",
            &["manageAll", "viewAll"],
            None,
        ),
        named_role(
            "pastorMinisterial",
            "Pastor Ministerial",
            &["manageArea", "viewAll"],
            Some("pastorGeneral"),
        ),
        named_role(
            "liderDeCartera",
            "Líder de Cartera",
            &["manageArea"],
            Some("pastorMinisterial"),
        ),
        named_role(
            "administrador",
            "Administrador",
            &["manageFinances", "viewAll"],
            Some("pastorGeneral"),
        ),
        named_role("servidor", "Servidor", &["serve"], None),
        named_role("miembro", "Miembro", &["attend"], None),
    ]
}
