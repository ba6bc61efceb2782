//! User domain types and validation rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sion_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::RoleId;
use crate::identifier::document_id;

/// Unique identifier for a user record, used as its document id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonEmptyString);

impl UserId {
    /// Creates a validated user identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        document_id("user", value).map(Self)
    }

    /// Creates a new random user identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().simple().to_string()).unwrap_or_else(|_| unreachable!())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Lifecycle state of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account is in use.
    #[default]
    Active,
    /// Account is kept for records but no longer in use.
    Inactive,
}

impl UserStatus {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown user status '{value}'"
            ))),
        }
    }
}

/// Contact details captured for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Given name.
    pub name: NonEmptyString,
    /// Family name.
    pub last_name: Option<String>,
    /// Preferred display name.
    pub display_name: Option<String>,
    /// Contact email.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

impl UserProfile {
    /// Returns the display name, falling back to `name lastName`.
    #[must_use]
    pub fn effective_display_name(&self) -> String {
        if let Some(display_name) = self
            .display_name
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            return display_name.to_owned();
        }

        match self
            .last_name
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            Some(last_name) => format!("{} {last_name}", self.name),
            None => self.name.as_str().to_owned(),
        }
    }
}

/// Creation and modification stamps carried by stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStamps {
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Subject that created the record.
    pub created_by: Option<String>,
    /// Subject that last modified the record.
    pub updated_by: Option<String>,
}

impl RecordStamps {
    /// Stamps a freshly created record.
    #[must_use]
    pub fn created(actor: &str, at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(at),
            updated_at: Some(at),
            created_by: Some(actor.to_owned()),
            updated_by: Some(actor.to_owned()),
        }
    }
}

/// Stored user record with its role references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    id: UserId,
    profile: UserProfile,
    status: UserStatus,
    role_ids: Vec<RoleId>,
    stamps: RecordStamps,
}

impl UserRecord {
    /// Creates a user record.
    #[must_use]
    pub fn new(
        id: UserId,
        profile: UserProfile,
        status: UserStatus,
        role_ids: Vec<RoleId>,
        stamps: RecordStamps,
    ) -> Self {
        Self {
            id,
            profile,
            status,
            role_ids,
            stamps,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns contact details.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the account status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Returns the referenced roles in stored order.
    #[must_use]
    pub fn role_ids(&self) -> &[RoleId] {
        self.role_ids.as_slice()
    }

    /// Returns creation and modification stamps.
    #[must_use]
    pub fn stamps(&self) -> &RecordStamps {
        &self.stamps
    }
}
