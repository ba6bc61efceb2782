use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sion_core::{AppResult, NonEmptyString};

use crate::Permission;
use crate::identifier::document_id;

/// Stable role identifier, used as the role's document id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(NonEmptyString);

impl RoleId {
    /// Creates a validated role identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        document_id("role", value).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Named bundle of permissions, optionally inheriting another role's grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    permissions: BTreeSet<Permission>,
    inherits_from: Option<RoleId>,
}

impl Role {
    /// Creates a role with validated fields.
    ///
    /// Duplicate permissions collapse into one entry.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
        inherits_from: Option<RoleId>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            permissions: permissions.into_iter().collect(),
            inherits_from,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> &RoleId {
        &self.id
    }

    /// Returns the human-friendly role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the permissions declared directly on this role.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the parent role, if any.
    #[must_use]
    pub fn inherits_from(&self) -> Option<&RoleId> {
        self.inherits_from.as_ref()
    }
}
