use chrono::Utc;
use sion_core::{AppError, AppResult, NonEmptyString};
use sion_domain::{
    EmailAddress, RecordStamps, RoleId, UserId, UserProfile, UserRecord, UserStatus,
};
use tracing::info;

use crate::CreateUserInput;

use super::UserService;

impl UserService {
    /// Creates a user with the given roles.
    ///
    /// Every referenced role must exist and the email must not be in use.
    pub async fn add_user(&self, actor: &str, input: CreateUserInput) -> AppResult<UserRecord> {
        let email = EmailAddress::new(input.email)?;
        let name = NonEmptyString::new(input.name.trim())
            .map_err(|_| AppError::Validation("user name is required".to_owned()))?;

        let mut role_ids: Vec<RoleId> = Vec::with_capacity(input.role_ids.len());
        for value in input.role_ids {
            let role_id = RoleId::new(value)?;
            if !role_ids.contains(&role_id) {
                role_ids.push(role_id);
            }
        }

        for role_id in &role_ids {
            if self.role_repository.find_role(role_id).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "role '{role_id}' does not exist"
                )));
            }
        }

        if self
            .user_repository
            .find_user_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                email.as_str()
            )));
        }

        let user = UserRecord::new(
            UserId::generate(),
            UserProfile {
                name,
                last_name: normalize_optional(input.last_name),
                display_name: normalize_optional(input.display_name),
                email,
                phone: normalize_optional(input.phone),
                avatar: normalize_optional(input.avatar),
                address: normalize_optional(input.address),
            },
            UserStatus::Active,
            role_ids,
            RecordStamps::created(actor, Utc::now()),
        );

        self.user_repository.create_user(user.clone()).await?;

        info!(
            user_id = %user.id(),
            actor = actor,
            role_count = user.role_ids().len(),
            "user created"
        );

        Ok(user)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
