use async_trait::async_trait;
use sion_application::{AccessAuditEvent, AccessAuditRepository};
use sion_core::AppResult;
use tokio::sync::RwLock;

/// In-memory access audit trail.
#[derive(Debug, Default)]
pub struct InMemoryAccessAuditRepository {
    events: RwLock<Vec<AccessAuditEvent>>,
}

impl InMemoryAccessAuditRepository {
    /// Creates an empty audit trail.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Returns the recorded events in append order.
    pub async fn events(&self) -> Vec<AccessAuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AccessAuditRepository for InMemoryAccessAuditRepository {
    async fn append_event(&self, event: AccessAuditEvent) -> AppResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}
