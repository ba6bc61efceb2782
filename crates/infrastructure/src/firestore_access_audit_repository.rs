use async_trait::async_trait;
use sion_application::{AccessAuditEvent, AccessAuditRepository};
use sion_core::AppResult;

use crate::firestore_client::{Fields, FirestoreClient, FirestoreValue};

const ACCESS_AUDIT_COLLECTION: &str = "accessAudit";

/// Appends access audit events to the `accessAudit` collection.
#[derive(Debug, Clone)]
pub struct FirestoreAccessAuditRepository {
    client: FirestoreClient,
}

impl FirestoreAccessAuditRepository {
    /// Creates a repository using a shared client.
    #[must_use]
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccessAuditRepository for FirestoreAccessAuditRepository {
    async fn append_event(&self, event: AccessAuditEvent) -> AppResult<()> {
        let fields = Fields::from([
            ("userId".to_owned(), FirestoreValue::string(event.user_id.as_str())),
            (
                "permission".to_owned(),
                FirestoreValue::string(event.permission.as_str()),
            ),
            (
                "decision".to_owned(),
                FirestoreValue::string(event.decision.as_str()),
            ),
            (
                "occurredAt".to_owned(),
                FirestoreValue::timestamp(event.occurred_at),
            ),
        ]);

        self.client
            .create_document(ACCESS_AUDIT_COLLECTION, None, fields)
            .await
            .map(|_| ())
    }
}
