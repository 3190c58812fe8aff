//! Shared validation helpers for the HTTP adapter.
//!
//! Request DTOs carry optional fields so a missing value becomes a
//! structured 400 instead of a serde deserialization failure.

use pagination::PageRequest;
use serde_json::json;

use crate::domain::Error;

/// 400 for a field the request body must carry.
pub(crate) fn missing_field(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// 400 for a field whose value failed domain parsing.
pub(crate) fn invalid_field(field: &'static str, message: impl Into<String>) -> Error {
    Error::invalid_request(message.into()).with_details(json!({
        "field": field,
        "code": "invalid_value",
    }))
}

/// Require a field, with a structured error when absent.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field(field))
}

/// Validate `page`/`limit` query parameters.
pub(crate) fn page_request(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "code": "invalid_pagination",
        }))
    })
}
