use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sion_core::{AppError, AppResult};

use super::value::{Fields, FirestoreValue};

/// Document resource as returned by the Firestore REST API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Document fields.
    #[serde(default)]
    pub fields: Fields,
    /// Server creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// Server update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl FirestoreDocument {
    /// Creates a write payload from fields.
    #[must_use]
    pub fn from_fields(fields: Fields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Returns the document id, the last segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

/// Returns the id of the referenced document when `reference` points into `collection`.
#[must_use]
pub fn referenced_id<'a>(reference: &'a str, collection: &str) -> Option<&'a str> {
    let mut segments = reference.rsplit('/');
    let id = segments.next().filter(|id| !id.is_empty())?;
    (segments.next() == Some(collection)).then_some(id)
}

/// Schema-checked accessors over one stored document.
///
/// Every accessor fails with [`AppError::MalformedDocument`] naming the
/// collection, the document id and the offending field.
pub struct DocumentReader<'a> {
    collection: &'a str,
    document: &'a FirestoreDocument,
}

impl<'a> DocumentReader<'a> {
    /// Wraps a document read from `collection`.
    #[must_use]
    pub fn new(collection: &'a str, document: &'a FirestoreDocument) -> Self {
        Self {
            collection,
            document,
        }
    }

    /// Returns the document id.
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.document.id()
    }

    /// Builds a malformed-document error for `field`.
    #[must_use]
    pub fn malformed(&self, field: &str, detail: impl std::fmt::Display) -> AppError {
        AppError::MalformedDocument(format!(
            "{}/{} field '{field}': {detail}",
            self.collection,
            self.id()
        ))
    }

    fn present(&self, field: &str) -> Option<&'a FirestoreValue> {
        match self.document.fields.get(field) {
            None | Some(FirestoreValue::NullValue(())) => None,
            Some(value) => Some(value),
        }
    }

    /// Reads a required string field.
    pub fn required_string(&self, field: &str) -> AppResult<&'a str> {
        self.optional_string(field)?
            .ok_or_else(|| self.malformed(field, "is required"))
    }

    /// Reads a string field that may be absent or null.
    pub fn optional_string(&self, field: &str) -> AppResult<Option<&'a str>> {
        match self.present(field) {
            None => Ok(None),
            Some(FirestoreValue::StringValue(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.malformed(
                field,
                format!("expected stringValue, found {}", other.type_name()),
            )),
        }
    }

    /// Reads a required array whose items are all strings.
    pub fn required_string_array(&self, field: &str) -> AppResult<Vec<&'a str>> {
        let values = match self.present(field) {
            None => return Err(self.malformed(field, "is required")),
            Some(FirestoreValue::ArrayValue(array)) => &array.values,
            Some(other) => {
                return Err(self.malformed(
                    field,
                    format!("expected arrayValue, found {}", other.type_name()),
                ));
            }
        };

        values
            .iter()
            .map(|value| match value {
                FirestoreValue::StringValue(value) => Ok(value.as_str()),
                other => Err(self.malformed(
                    field,
                    format!("expected string items, found {}", other.type_name()),
                )),
            })
            .collect()
    }

    /// Reads a timestamp field that may be absent or null.
    pub fn optional_timestamp(&self, field: &str) -> AppResult<Option<DateTime<Utc>>> {
        match self.present(field) {
            None => Ok(None),
            Some(FirestoreValue::TimestampValue(value)) => DateTime::parse_from_rfc3339(value)
                .map(|value| Some(value.with_timezone(&Utc)))
                .map_err(|error| self.malformed(field, format!("invalid timestamp: {error}"))),
            Some(other) => Err(self.malformed(
                field,
                format!("expected timestampValue, found {}", other.type_name()),
            )),
        }
    }

    /// Reads an optional link to a document in `target_collection`.
    ///
    /// Accepts a reference into the target collection or a plain string id.
    pub fn optional_link(
        &self,
        field: &str,
        target_collection: &str,
    ) -> AppResult<Option<&'a str>> {
        self.present(field)
            .map(|value| self.link_id(field, value, target_collection))
            .transpose()
    }

    /// Reads a list of links to documents in `target_collection`.
    ///
    /// An absent or null field is an empty list.
    pub fn link_list(&self, field: &str, target_collection: &str) -> AppResult<Vec<&'a str>> {
        match self.present(field) {
            None => Ok(Vec::new()),
            Some(FirestoreValue::ArrayValue(array)) => array
                .values
                .iter()
                .map(|value| self.link_id(field, value, target_collection))
                .collect(),
            Some(other) => Err(self.malformed(
                field,
                format!("expected arrayValue, found {}", other.type_name()),
            )),
        }
    }

    fn link_id(
        &self,
        field: &str,
        value: &'a FirestoreValue,
        target_collection: &str,
    ) -> AppResult<&'a str> {
        match value {
            FirestoreValue::StringValue(id) => Ok(id.as_str()),
            FirestoreValue::ReferenceValue(reference) => {
                referenced_id(reference, target_collection).ok_or_else(|| {
                    self.malformed(
                        field,
                        format!("reference '{reference}' does not point into '{target_collection}'"),
                    )
                })
            }
            other => Err(self.malformed(
                field,
                format!(
                    "expected referenceValue or stringValue, found {}",
                    other.type_name()
                ),
            )),
        }
    }
}
