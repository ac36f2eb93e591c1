//! Saved record schema for the `chart_data` table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::dataset::{Dataset, DatasetEntry};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("email is empty")]
    Empty,
    #[error("email must contain '@'")]
    MissingAt,
}

/// Email address used as the lookup key for a saved dataset.
///
/// Only the presence of `@` is checked; anything stricter is left to the
/// visitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        if !trimmed.contains('@') {
            return Err(IdentityError::MissingAt);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Which kind of dataset a record holds. Only the call-success series is
/// editable today; unknown values are rejected when reading from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "call_success")]
    CallSuccess,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CallSuccess => "call_success",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "call_success" => Ok(Self::CallSuccess),
            other => Err(StoreError::Decode(format!("unknown chart_type `{other}`"))),
        }
    }
}

/// A persisted dataset, at most one per (identity, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "email")]
    pub identity: Identity,
    #[serde(rename = "chart_type")]
    pub category: Category,
    #[serde(rename = "data")]
    pub payload: Dataset,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Row body for an insert; timestamps are filled in by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    #[serde(rename = "email")]
    pub identity: Identity,
    #[serde(rename = "chart_type")]
    pub category: Category,
    #[serde(rename = "data")]
    pub payload: Dataset,
}

impl NewRecord {
    pub fn new(identity: Identity, category: Category, payload: Dataset) -> Self {
        Self {
            identity,
            category,
            payload,
        }
    }
}

/// A row exactly as the store returns it, before any checks.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub id: Option<Value>,
    pub email: String,
    pub chart_type: String,
    pub data: Value,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl TryFrom<RawRecord> for SavedRecord {
    type Error = StoreError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let identity = Identity::parse(&raw.email)
            .map_err(|err| StoreError::Decode(format!("stored email `{}`: {err}", raw.email)))?;
        let category = raw.chart_type.parse::<Category>()?;
        let entries: Vec<DatasetEntry> = serde_json::from_value(raw.data)?;
        let payload = Dataset::try_from(entries)?;
        let id = raw.id.and_then(|value| match value {
            Value::Null => None,
            Value::String(id) => Some(id),
            other => Some(other.to_string()),
        });

        // Missing timestamps borrow from each other, then from the clock.
        let updated_at = raw
            .updated_at
            .or(raw.created_at)
            .unwrap_or_else(OffsetDateTime::now_utc);
        let created_at = raw.created_at.unwrap_or(updated_at);

        Ok(Self {
            id,
            identity,
            category,
            payload,
            created_at,
            updated_at,
        })
    }
}

/// Decode one row and validate it.
pub(crate) fn decode_record(value: Value) -> Result<SavedRecord, StoreError> {
    let raw: RawRecord = serde_json::from_value(value)?;
    SavedRecord::try_from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;
    use serde_json::json;

    fn row(data: Value) -> Value {
        json!({
            "id": "4b1f3c2e-0000-4000-8000-000000000001",
            "email": "a@b.com",
            "chart_type": "call_success",
            "data": data,
            "created_at": "2024-12-29T10:00:00.123456+00:00",
            "updated_at": "2024-12-29T11:30:00+00:00"
        })
    }

    #[test]
    fn identity_requires_at_sign() {
        assert_eq!(Identity::parse(""), Err(IdentityError::Empty));
        assert_eq!(Identity::parse("   "), Err(IdentityError::Empty));
        assert_eq!(Identity::parse("someone"), Err(IdentityError::MissingAt));
        assert_eq!(Identity::parse(" a@b.com ").unwrap().as_str(), "a@b.com");
    }

    #[test]
    fn category_round_trips_known_values_only() {
        assert_eq!("call_success".parse::<Category>().unwrap(), Category::CallSuccess);
        assert!("latency".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_value(Category::CallSuccess).unwrap(),
            json!("call_success")
        );
    }

    #[test]
    fn decodes_a_store_row() {
        let record = decode_record(row(json!([
            { "time": "12:00 AM", "successRate": 50, "failureRate": 50 }
        ])))
        .unwrap();
        assert_eq!(record.identity.as_str(), "a@b.com");
        assert_eq!(record.category, Category::CallSuccess);
        assert_eq!(record.payload.len(), 1);
        assert!(record.updated_at > record.created_at);
        assert_eq!(
            record.id.as_deref(),
            Some("4b1f3c2e-0000-4000-8000-000000000001")
        );
    }

    #[test]
    fn null_or_missing_timestamps_still_decode() {
        let data = json!([{ "time": "x", "successRate": 1, "failureRate": 2 }]);

        let mut value = row(data.clone());
        value["updated_at"] = Value::Null;
        let record = decode_record(value).unwrap();
        assert_eq!(record.updated_at, record.created_at);

        let mut value = row(data.clone());
        value["created_at"] = Value::Null;
        let record = decode_record(value).unwrap();
        assert_eq!(record.created_at, record.updated_at);

        let mut value = row(data);
        let fields = value.as_object_mut().unwrap();
        fields.remove("created_at");
        fields.remove("updated_at");
        let before = OffsetDateTime::now_utc();
        let record = decode_record(value).unwrap();
        assert!(record.updated_at >= before);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn numeric_ids_are_kept_as_text() {
        let mut value = row(json!([{ "time": "x", "successRate": 1, "failureRate": 2 }]));
        value["id"] = json!(42);
        assert_eq!(decode_record(value).unwrap().id.as_deref(), Some("42"));
    }

    #[test]
    fn malformed_payload_is_rejected_at_the_boundary() {
        let err = decode_record(row(json!([]))).unwrap_err();
        assert_eq!(err, StoreError::InvalidPayload(DatasetError::Empty));

        let err = decode_record(row(json!({ "time": "12:00 AM" }))).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut value = row(json!([{ "time": "x", "successRate": 1, "failureRate": 2 }]));
        value["chart_type"] = json!("sentiment");
        let err = decode_record(value).unwrap_err();
        assert!(err.to_string().contains("sentiment"));
    }

    #[test]
    fn new_record_uses_table_column_names() {
        let record = NewRecord::new(
            Identity::parse("a@b.com").unwrap(),
            Category::CallSuccess,
            Dataset::default(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["email"], json!("a@b.com"));
        assert_eq!(value["chart_type"], json!("call_success"));
        assert_eq!(value["data"].as_array().map(Vec::len), Some(8));
    }
}
