//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Category, Error, Role, UserId};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_field(field: FieldName, message: String, code: &str, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code,
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        invalid_field(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            "invalid_uuid",
            value,
        )
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            invalid_field(
                field,
                format!("{} must be an RFC 3339 timestamp", field.as_str()),
                "invalid_timestamp",
                value,
            )
        })
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

pub(crate) fn parse_category(value: &str, field: FieldName) -> Result<Category, Error> {
    Category::from_str(value).map_err(|_| {
        invalid_field(
            field,
            format!("{} must be gear, vehicle, or room", field.as_str()),
            "invalid_category",
            value,
        )
    })
}

pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    Role::from_str(value).map_err(|_| {
        invalid_field(
            field,
            format!("{} must be renter or owner", field.as_str()),
            "invalid_role",
            value,
        )
    })
}
