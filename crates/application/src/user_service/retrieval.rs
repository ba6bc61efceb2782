use sion_core::{AppError, AppResult};
use sion_domain::{UserId, UserRecord};

use super::UserService;

impl UserService {
    /// Returns a user record by id.
    pub async fn find_user(&self, user_id: &UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Lists users ordered by display name, then id.
    pub async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let mut users = self.user_repository.list_users().await?;
        users.sort_by_cached_key(|user| {
            (
                user.profile().effective_display_name().to_lowercase(),
                user.id().clone(),
            )
        });
        Ok(users)
    }
}
