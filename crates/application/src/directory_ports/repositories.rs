use async_trait::async_trait;
use sion_core::AppResult;
use sion_domain::{EmailAddress, Role, RoleId, UserId, UserRecord};

/// Repository port for role documents.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Finds a role by id.
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>>;

    /// Lists every stored role.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Stores a role keyed by its id, replacing any previous version.
    async fn save_role(&self, role: Role) -> AppResult<()>;
}

/// Repository port for user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by canonical email address.
    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Lists every stored user.
    async fn list_users(&self) -> AppResult<Vec<UserRecord>>;

    /// Creates a new user record.
    ///
    /// Fails with a conflict when a record with the same id already exists.
    async fn create_user(&self, user: UserRecord) -> AppResult<()>;
}
