//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request structs deserialize every field as optional; these helpers turn
//! missing or malformed values into `ValidationError`s carrying
//! `{"field", "code", "value"?}` details.

use chrono::{NaiveDate, NaiveTime};
use pagination::{PageRequest, PaginationError};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{CredentialsValidationError, Error, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidTime,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

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

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::validation(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::validation(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
        "value": value,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap a required request field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    let name = field.as_str();
    Uuid::parse_str(value.trim()).map_err(|_| {
        value_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
            value,
        )
    })
}

pub(crate) fn parse_optional_uuid(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let name = field.as_str();
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        value_error(
            field,
            ErrorCode::InvalidDate,
            format!("{name} must be a date formatted YYYY-MM-DD"),
            value,
        )
    })
}

/// Parse an `HH:MM` wall-clock time. Seconds are rejected.
pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<NaiveTime, Error> {
    let name = field.as_str();
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        value_error(
            field,
            ErrorCode::InvalidTime,
            format!("{name} must be a time formatted HH:MM"),
            value,
        )
    })
}

/// Reject a numeric query parameter outside `range`.
pub(crate) fn ensure_in_range(
    value: usize,
    range: std::ops::RangeInclusive<usize>,
    field: FieldName,
) -> Result<usize, Error> {
    if range.contains(&value) {
        return Ok(value);
    }
    let name = field.as_str();
    Err(value_error(
        field,
        ErrorCode::OutOfRange,
        format!(
            "{name} must be between {} and {}",
            range.start(),
            range.end()
        ),
        &value.to_string(),
    ))
}

/// Build a page request from optional `page`/`perPage` query values.
pub(crate) fn page_request(
    page: Option<u32>,
    per_page: Option<u32>,
    default_per_page: u32,
) -> Result<PageRequest, Error> {
    PageRequest::from_parts(page, per_page, default_per_page).map_err(|err| {
        let (field, value) = match err {
            PaginationError::PageOutOfRange => ("page", page.unwrap_or_default()),
            PaginationError::PerPageOutOfRange { value } => ("perPage", value),
        };
        Error::validation(err.to_string()).with_details(json!({
            "field": field,
            "code": ErrorCode::OutOfRange.as_str(),
            "value": value,
        }))
    })
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn identity_details(err: &UserValidationError) -> (&'static str, &'static str) {
    match err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ("id", "invalid_uuid"),
        UserValidationError::EmptyEmail => ("email", "empty"),
        UserValidationError::EmailTooLong { .. } => ("email", "too_long"),
        UserValidationError::InvalidEmail => ("email", "invalid_format"),
        UserValidationError::UsernameLength { .. } => ("username", "invalid_length"),
        UserValidationError::UsernameInvalidCharacters => ("username", "invalid_characters"),
    }
}

/// Map credential parsing failures, attributing password problems to
/// `password_field`.
pub(crate) fn credentials_error(err: CredentialsValidationError, password_field: FieldName) -> Error {
    let (field, code) = match &err {
        CredentialsValidationError::Identity(identity) => identity_details(identity),
        CredentialsValidationError::EmptyPassword => (password_field.as_str(), "empty"),
        CredentialsValidationError::PasswordTooShort { .. } => {
            (password_field.as_str(), "too_short")
        }
    };
    Error::validation(err.to_string()).with_details(json!({ "field": field, "code": code }))
}
