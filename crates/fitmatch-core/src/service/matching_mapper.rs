//! Matching mapper - stored matching record to client representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Matching, MatchingStatus};

/// Client-facing representation of a matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResponse {
    pub id: Uuid,
    pub interacted_user: Uuid,
    pub interacting_user: Uuid,
    pub status: MatchingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored record could not be turned into a [`MatchingResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("mapping error: missing field `{0}`")]
    MissingField(&'static str),

    #[error("mapping error: invalid value {value:?} for field `{field}`")]
    InvalidField { field: &'static str, value: String },
}

/// Pure transformations between stored matchings and their DTO
pub struct MatchingMapper;

impl MatchingMapper {
    /// Map a typed matching. Total for every well-formed record.
    pub fn to_response(matching: &Matching) -> MatchingResponse {
        MatchingResponse {
            id: matching.id,
            interacted_user: matching.interacted_user,
            interacting_user: matching.interacting_user,
            status: matching.status,
            created_at: matching.created_at,
            updated_at: matching.updated_at,
        }
    }

    /// Inverse of [`MatchingMapper::to_response`]
    pub fn to_matching(response: &MatchingResponse) -> Matching {
        Matching {
            id: response.id,
            interacted_user: response.interacted_user,
            interacting_user: response.interacting_user,
            status: response.status,
            created_at: response.created_at,
            updated_at: response.updated_at,
        }
    }

    /// Map an untyped stored record (snake_case document fields).
    ///
    /// Fails with [`MappingError`] when a required field is absent or malformed.
    pub fn from_record(record: &Value) -> Result<MatchingResponse, MappingError> {
        let id = uuid_field(record, "id")?;
        let interacted_user = uuid_field(record, "interacted_user")?;
        let interacting_user = uuid_field(record, "interacting_user")?;

        let status_raw = str_field(record, "status")?;
        let status = MatchingStatus::parse(status_raw).ok_or_else(|| MappingError::InvalidField {
            field: "status",
            value: status_raw.to_string(),
        })?;

        let created_at = time_field(record, "created_at")?;
        // Records written before updates were tracked only carry created_at
        let updated_at = match record.get("updated_at") {
            Some(Value::Null) | None => created_at,
            Some(_) => time_field(record, "updated_at")?,
        };

        Ok(MatchingResponse {
            id,
            interacted_user,
            interacting_user,
            status,
            created_at,
            updated_at,
        })
    }
}

fn str_field<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, MappingError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(MappingError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(MappingError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn uuid_field(record: &Value, field: &'static str) -> Result<Uuid, MappingError> {
    let raw = str_field(record, field)?;
    raw.parse().map_err(|_| MappingError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn time_field(record: &Value, field: &'static str) -> Result<DateTime<Utc>, MappingError> {
    let raw = str_field(record, field)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MappingError::InvalidField {
            field,
            value: raw.to_string(),
        })
}
