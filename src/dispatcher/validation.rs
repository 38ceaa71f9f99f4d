//! Request schema validation. Turns untyped mappings into a [`BatchJob`] or rejects the batch.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{BatchJob, RequestDescriptor};

const URL_KEY: &str = "url";
const BODY_KEY: &str = "body";

/// Validate every element of a raw batch.
///
/// Stops at the first malformed element and rejects the whole batch, so a caller
/// never sees a partially dispatched call. An empty slice is a valid, empty job.
pub fn validate(raw: &[Value]) -> Result<BatchJob, ValidationError> {
    raw.iter()
        .enumerate()
        .map(|(index, element)| parse_descriptor(index, element))
        .collect::<Result<Vec<_>, _>>()
        .map(BatchJob::from)
}

fn parse_descriptor(index: usize, element: &Value) -> Result<RequestDescriptor, ValidationError> {
    let map = element
        .as_object()
        .ok_or(ValidationError::NotAnObject { index })?;

    // Both keys are checked for presence before either value, so a mapping with
    // neither key always reports the url first.
    let url = map.get(URL_KEY).ok_or(ValidationError::MissingKey {
        index,
        key: URL_KEY,
    })?;
    let body = map.get(BODY_KEY).ok_or(ValidationError::MissingKey {
        index,
        key: BODY_KEY,
    })?;

    let url = url.as_str().ok_or(ValidationError::NotAString {
        index,
        key: URL_KEY,
    })?;
    let body = body.as_str().ok_or(ValidationError::NotAString {
        index,
        key: BODY_KEY,
    })?;

    if url.is_empty() {
        return Err(ValidationError::EmptyUrl { index });
    }

    Ok(RequestDescriptor::from_validated(
        url.to_string(),
        body.to_string(),
    ))
}
