use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sion_core::AppResult;
use sion_domain::{AccessDecision, Permission, UserId};

/// Audit record written for every completed access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessAuditEvent {
    /// Checked user.
    pub user_id: UserId,
    /// Permission that was required.
    pub permission: Permission,
    /// Outcome of the check.
    pub decision: AccessDecision,
    /// Time the decision was made.
    pub occurred_at: DateTime<Utc>,
}

/// Append-only sink for access audit records.
#[async_trait]
pub trait AccessAuditRepository: Send + Sync {
    /// Appends one audit event.
    async fn append_event(&self, event: AccessAuditEvent) -> AppResult<()>;
}
