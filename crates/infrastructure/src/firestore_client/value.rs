use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Field map of a Firestore document or map value.
pub type Fields = BTreeMap<String, FirestoreValue>;

/// Typed value in Firestore's REST JSON encoding.
///
/// Each variant serializes as a single-key object, e.g. `{"stringValue": "x"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    /// Explicit null.
    NullValue(()),
    /// Boolean value.
    BooleanValue(bool),
    /// 64-bit integer, transported as a decimal string.
    IntegerValue(String),
    /// Double precision float.
    DoubleValue(f64),
    /// RFC3339 timestamp.
    TimestampValue(String),
    /// UTF-8 string.
    StringValue(String),
    /// Base64-encoded bytes.
    BytesValue(String),
    /// Full resource name of another document.
    ReferenceValue(String),
    /// Latitude/longitude pair.
    GeoPointValue(LatLng),
    /// Ordered list of values.
    ArrayValue(ArrayValue),
    /// Nested field map.
    MapValue(MapValue),
}

/// Payload of an `arrayValue`; Firestore omits `values` for empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Array items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<FirestoreValue>,
}

/// Payload of a `geoPointValue`; Firestore omits zero coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Degrees latitude.
    #[serde(default)]
    pub latitude: f64,
    /// Degrees longitude.
    #[serde(default)]
    pub longitude: f64,
}

/// Payload of a `mapValue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    /// Nested fields.
    #[serde(default)]
    pub fields: Fields,
}

impl FirestoreValue {
    /// Builds a string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    /// Builds a string value, or null when absent.
    #[must_use]
    pub fn optional_string(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::NullValue(()), Self::string)
    }

    /// Builds an array of string values.
    #[must_use]
    pub fn string_array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ArrayValue(ArrayValue {
            values: values.into_iter().map(Self::string).collect(),
        })
    }

    /// Builds a timestamp value with microsecond precision.
    #[must_use]
    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Self::TimestampValue(value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    /// Returns the Firestore type name, used in decoding errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NullValue(()) => "nullValue",
            Self::BooleanValue(_) => "booleanValue",
            Self::IntegerValue(_) => "integerValue",
            Self::DoubleValue(_) => "doubleValue",
            Self::TimestampValue(_) => "timestampValue",
            Self::StringValue(_) => "stringValue",
            Self::BytesValue(_) => "bytesValue",
            Self::ReferenceValue(_) => "referenceValue",
            Self::GeoPointValue(_) => "geoPointValue",
            Self::ArrayValue(_) => "arrayValue",
            Self::MapValue(_) => "mapValue",
        }
    }
}
