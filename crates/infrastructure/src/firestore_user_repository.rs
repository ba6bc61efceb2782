use async_trait::async_trait;
use sion_application::UserRepository;
use sion_core::{AppResult, NonEmptyString};
use sion_domain::{
    EmailAddress, RecordStamps, RoleId, UserId, UserProfile, UserRecord, UserStatus,
};
use tracing::debug;

use crate::firestore_client::{
    ArrayValue, DocumentReader, Fields, FirestoreClient, FirestoreDocument, FirestoreValue,
};
use crate::firestore_role_repository::ROLES_COLLECTION;

const USERS_COLLECTION: &str = "users";

/// Firestore-backed user repository over the `users` collection.
///
/// Role assignments are written as references into `roles`; plain string ids
/// written by older tooling are accepted on read.
#[derive(Debug, Clone)]
pub struct FirestoreUserRepository {
    client: FirestoreClient,
}

impl FirestoreUserRepository {
    /// Creates a repository using a shared client.
    #[must_use]
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn encode_user(&self, user: &UserRecord) -> Fields {
        let profile = user.profile();
        let stamps = user.stamps();
        let mut fields = Fields::from([
            ("name".to_owned(), FirestoreValue::string(profile.name.as_str())),
            ("email".to_owned(), FirestoreValue::string(profile.email.as_str())),
            ("status".to_owned(), FirestoreValue::string(user.status().as_str())),
            (
                "roles".to_owned(),
                FirestoreValue::ArrayValue(ArrayValue {
                    values: user
                        .role_ids()
                        .iter()
                        .map(|role_id| {
                            FirestoreValue::ReferenceValue(
                                self.client.document_name(ROLES_COLLECTION, role_id.as_str()),
                            )
                        })
                        .collect(),
                }),
            ),
        ]);

        let optional_strings = [
            ("lastName", profile.last_name.as_deref()),
            ("displayName", profile.display_name.as_deref()),
            ("phone", profile.phone.as_deref()),
            ("avatar", profile.avatar.as_deref()),
            ("address", profile.address.as_deref()),
            ("createdBy", stamps.created_by.as_deref()),
            ("updatedBy", stamps.updated_by.as_deref()),
        ];
        for (field, value) in optional_strings {
            if let Some(value) = value {
                fields.insert(field.to_owned(), FirestoreValue::string(value));
            }
        }

        for (field, value) in [("createdAt", stamps.created_at), ("updatedAt", stamps.updated_at)] {
            if let Some(value) = value {
                fields.insert(field.to_owned(), FirestoreValue::timestamp(value));
            }
        }

        fields
    }
}

#[async_trait]
impl UserRepository for FirestoreUserRepository {
    async fn find_user(&self, user_id: &UserId) -> AppResult<Option<UserRecord>> {
        self.client
            .get_document(USERS_COLLECTION, user_id.as_str())
            .await?
            .as_ref()
            .map(decode_user)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let documents = self
            .client
            .query_equal(
                USERS_COLLECTION,
                "email",
                FirestoreValue::string(email.as_str()),
                1,
            )
            .await?;

        documents.first().map(decode_user).transpose()
    }

    async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        let documents = self.client.list_documents(USERS_COLLECTION).await?;
        documents.iter().map(decode_user).collect()
    }

    async fn create_user(&self, user: UserRecord) -> AppResult<()> {
        debug!(user_id = %user.id(), "creating user document");
        self.client
            .create_document(
                USERS_COLLECTION,
                Some(user.id().as_str()),
                self.encode_user(&user),
            )
            .await
            .map(|_| ())
    }
}

fn decode_user(document: &FirestoreDocument) -> AppResult<UserRecord> {
    let reader = DocumentReader::new(USERS_COLLECTION, document);

    let id = UserId::new(reader.id()).map_err(|error| reader.malformed("id", error))?;
    let name = NonEmptyString::new(reader.required_string("name")?)
        .map_err(|error| reader.malformed("name", error))?;
    let email = EmailAddress::new(reader.required_string("email")?)
        .map_err(|error| reader.malformed("email", error))?;
    let status = reader
        .optional_string("status")?
        .map(|value| {
            value
                .parse::<UserStatus>()
                .map_err(|error| reader.malformed("status", error))
        })
        .transpose()?
        .unwrap_or_default();
    let role_ids = reader
        .link_list("roles", ROLES_COLLECTION)?
        .into_iter()
        .map(|role_id| RoleId::new(role_id).map_err(|error| reader.malformed("roles", error)))
        .collect::<AppResult<Vec<_>>>()?;

    let owned = |field: &str| -> AppResult<Option<String>> {
        Ok(reader.optional_string(field)?.map(str::to_owned))
    };
    let profile = UserProfile {
        name,
        last_name: owned("lastName")?,
        display_name: owned("displayName")?,
        email,
        phone: owned("phone")?,
        avatar: owned("avatar")?,
        address: owned("address")?,
    };
    let stamps = RecordStamps {
        created_at: reader.optional_timestamp("createdAt")?,
        updated_at: reader.optional_timestamp("updatedAt")?,
        created_by: owned("createdBy")?,
        updated_by: owned("updatedBy")?,
    };

    Ok(UserRecord::new(id, profile, status, role_ids, stamps))
}

#[cfg(test)]
mod tests;
