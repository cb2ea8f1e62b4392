//! Envelope validation for completed responses.
//!
//! Order of checks: 204, HTTP status, envelope `code`, full shape. Data is
//! only handed out after all four pass.

use serde::de::DeserializeOwned;

use super::request::RawResponse;
use crate::error::{ClientError, DEFAULT_API_ERROR_MESSAGE};
use crate::models::api::BasicResponse;

/// Validates an enveloped response and parses it as `T`.
///
/// Returns `Ok(None)` for 204 without touching the body.
pub fn handle_response<T: DeserializeOwned>(raw: &RawResponse) -> Result<Option<T>, ClientError> {
    if raw.status == 204 {
        return Ok(None);
    }

    if !raw.is_success() {
        return Err(ClientError::Http { status: raw.status });
    }

    let basic: BasicResponse = serde_json::from_slice(&raw.body)
        .map_err(|e| ClientError::decode(format!("response envelope: {e}")))?;

    if !basic.code.is_success() {
        tracing::debug!(code = %basic.code, status = raw.status, "api reported failure");
        return Err(ClientError::Api {
            code: basic.code,
            message: basic
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_API_ERROR_MESSAGE.to_string()),
            codes: basic.codes.unwrap_or_default(),
            status: raw.status,
        });
    }

    serde_json::from_slice(&raw.body)
        .map(Some)
        .map_err(|e| ClientError::decode(format!("response body: {e}")))
}

/// Parses a bare (non-enveloped) body as `T`.
pub fn parse_unwrapped<T: DeserializeOwned>(raw: &RawResponse) -> Result<Option<T>, ClientError> {
    if raw.status == 204 {
        return Ok(None);
    }

    if !raw.is_success() {
        return Err(ClientError::Http { status: raw.status });
    }

    serde_json::from_slice(&raw.body)
        .map(Some)
        .map_err(|e| ClientError::decode(format!("response body: {e}")))
}
