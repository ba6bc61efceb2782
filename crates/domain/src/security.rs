use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sion_core::{AppError, AppResult, NonEmptyString};

/// Opaque capability identifier granted through roles.
///
/// Permissions carry no semantics of their own; they are compared by value
/// and only ever tested for membership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(NonEmptyString);

impl Permission {
    /// Creates a validated permission value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        NonEmptyString::new(value.trim())
            .map(Self)
            .map_err(|_| AppError::Validation("permission must not be empty".to_owned()))
    }

    /// Returns the stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Outcome of a single access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The required permission was present in the resolved set.
    Granted,
    /// The required permission was missing.
    Denied,
}

impl AccessDecision {
    /// Maps a membership test result into a decision.
    #[must_use]
    pub fn from_membership(is_member: bool) -> Self {
        if is_member {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Returns a stable storage value for this decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Returns whether access was granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}
