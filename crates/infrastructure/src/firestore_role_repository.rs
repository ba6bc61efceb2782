use async_trait::async_trait;
use sion_application::RoleRepository;
use sion_core::AppResult;
use sion_domain::{Permission, Role, RoleId};
use tracing::{debug, warn};

use crate::firestore_client::{
    DocumentReader, Fields, FirestoreClient, FirestoreDocument, FirestoreValue,
};

pub(crate) const ROLES_COLLECTION: &str = "roles";

/// Firestore-backed role repository over the `roles` collection.
#[derive(Debug, Clone)]
pub struct FirestoreRoleRepository {
    client: FirestoreClient,
}

impl FirestoreRoleRepository {
    /// Creates a repository using a shared client.
    #[must_use]
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleRepository for FirestoreRoleRepository {
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>> {
        self.client
            .get_document(ROLES_COLLECTION, role_id.as_str())
            .await?
            .as_ref()
            .map(decode_role)
            .transpose()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let documents = self.client.list_documents(ROLES_COLLECTION).await?;

        let mut roles = Vec::with_capacity(documents.len());
        for document in &documents {
            if let Some(stored_id) = legacy_role_id(document) {
                warn!(
                    document_id = document.id(),
                    stored_id,
                    "skipping role document stored under a generated id"
                );
                continue;
            }

            roles.push(decode_role(document)?);
        }

        Ok(roles)
    }

    async fn save_role(&self, role: Role) -> AppResult<()> {
        debug!(role_id = %role.id(), "saving role document");
        self.client
            .upsert_document(ROLES_COLLECTION, role.id().as_str(), encode_role(&role))
            .await
            .map(|_| ())
    }
}

pub(crate) fn decode_role(document: &FirestoreDocument) -> AppResult<Role> {
    let reader = DocumentReader::new(ROLES_COLLECTION, document);

    let id = RoleId::new(reader.id()).map_err(|error| reader.malformed("id", error))?;
    if let Some(stored_id) = reader.optional_string("id")?
        && stored_id != id.as_str()
    {
        return Err(reader.malformed(
            "id",
            format!("'{stored_id}' does not match the document id"),
        ));
    }

    let name = reader.required_string("name")?;
    let permissions = reader
        .required_string_array("permissions")?
        .into_iter()
        .map(|value| {
            Permission::new(value).map_err(|error| reader.malformed("permissions", error))
        })
        .collect::<AppResult<Vec<_>>>()?;
    let inherits_from = reader
        .optional_link("inheritsFrom", ROLES_COLLECTION)?
        .map(|parent| RoleId::new(parent).map_err(|error| reader.malformed("inheritsFrom", error)))
        .transpose()?;

    Role::new(id, name, permissions, inherits_from).map_err(|error| reader.malformed("name", error))
}

/// Returns the `id` field of a role document keyed by some other id.
///
/// Older tooling added roles with generated document ids and kept the role id
/// in the `id` field. Those records are never read by id.
fn legacy_role_id(document: &FirestoreDocument) -> Option<&str> {
    match document.fields.get("id") {
        Some(FirestoreValue::StringValue(stored_id)) if stored_id != document.id() => {
            Some(stored_id.as_str())
        }
        _ => None,
    }
}

pub(crate) fn encode_role(role: &Role) -> Fields {
    Fields::from([
        ("id".to_owned(), FirestoreValue::string(role.id().as_str())),
        ("name".to_owned(), FirestoreValue::string(role.name().as_str())),
        (
            "permissions".to_owned(),
            FirestoreValue::string_array(role.permissions().iter().map(Permission::as_str)),
        ),
        (
            "inheritsFrom".to_owned(),
            FirestoreValue::optional_string(role.inherits_from().map(RoleId::as_str)),
        ),
    ])
}
