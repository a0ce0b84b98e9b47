//! Gemini error mapping
//!
//! Translates HTTP statuses, Google error payloads and finish reasons into
//! the unified [`ProviderError`]. All Gemini-specific classification lives
//! here.

use serde_json::Value;

use crate::core::provider::error::ProviderError;

/// Maps raw Gemini failures onto [`ProviderError`] variants.
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    /// Classify a non-2xx HTTP response.
    pub fn from_http_status(status: u16, body: &str) -> ProviderError {
        match status {
            400 => ProviderError::invalid_request("gemini", format!("Bad request: {}", body)),
            401 => ProviderError::authentication("gemini", "Invalid or missing API key"),
            403 => ProviderError::authentication("gemini", "Forbidden: insufficient permissions"),
            404 => ProviderError::invalid_request("gemini", "Model or endpoint not found"),
            408 => ProviderError::deadline_exceeded("gemini", body),
            429 => {
                let retry_after = Self::extract_retry_after(body);
                ProviderError::rate_limit("gemini", body, retry_after)
            }
            503 => ProviderError::overloaded("gemini", body),
            504 => ProviderError::deadline_exceeded("gemini", body),
            500..=599 => {
                ProviderError::api_error("gemini", status, format!("Server error: {}", body))
            }
            _ => ProviderError::api_error("gemini", status, body),
        }
    }

    /// Classify an error object embedded in a 2xx JSON response.
    ///
    /// Google reports `{error: {code, message, status}}` where `status` is a
    /// canonical string such as `RESOURCE_EXHAUSTED`.
    pub fn from_api_response(response: &Value) -> ProviderError {
        if let Some(error) = response.get("error") {
            let code = error.get("code").and_then(Value::as_u64).unwrap_or(500) as u16;
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            let status = error.get("status").and_then(Value::as_str).unwrap_or("");

            return match (code, status) {
                (401, _) | (_, "UNAUTHENTICATED") => {
                    ProviderError::authentication("gemini", message)
                }
                (403, _) | (_, "PERMISSION_DENIED") => {
                    ProviderError::authentication("gemini", message)
                }
                (400, _) | (_, "INVALID_ARGUMENT") | (_, "FAILED_PRECONDITION") => {
                    ProviderError::invalid_request("gemini", message)
                }
                (404, _) | (_, "NOT_FOUND") => ProviderError::invalid_request("gemini", message),
                (_, "RESOURCE_EXHAUSTED") => ProviderError::quota_exceeded("gemini", message),
                (429, _) => {
                    let retry_after = Self::extract_retry_after_from_error(error);
                    ProviderError::rate_limit("gemini", message, retry_after)
                }
                (503, _) | (_, "UNAVAILABLE") => ProviderError::overloaded("gemini", message),
                (504, _) | (_, "DEADLINE_EXCEEDED") => {
                    ProviderError::deadline_exceeded("gemini", message)
                }
                _ => ProviderError::api_error("gemini", code, message),
            };
        }

        ProviderError::api_error("gemini", 500, "Unknown API error")
    }

    /// Classify a candidate that finished without usable text.
    pub fn from_finish_reason(reason: &str) -> ProviderError {
        match reason {
            "SAFETY" => {
                ProviderError::invalid_request("gemini", "Content blocked by safety filters")
            }
            "RECITATION" => {
                ProviderError::invalid_request("gemini", "Content blocked due to recitation")
            }
            "MAX_TOKENS" => ProviderError::invalid_request("gemini", "Maximum token limit reached"),
            _ => ProviderError::api_error(
                "gemini",
                500,
                format!("Unexpected finish reason: {}", reason),
            ),
        }
    }

    fn extract_retry_after(body: &str) -> Option<u64> {
        let json: Value = serde_json::from_str(body).ok()?;
        if let Some(error) = json.get("error") {
            return Self::extract_retry_after_from_error(error);
        }
        json.get("retry_after").and_then(Value::as_u64)
    }

    fn extract_retry_after_from_error(error: &Value) -> Option<u64> {
        if let Some(retry_after) = error.get("retry_after").and_then(Value::as_u64) {
            return Some(retry_after);
        }

        // RetryInfo detail entries carry the delay on quota errors.
        error
            .get("details")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find_map(|detail| detail.get("retry_after").and_then(Value::as_u64))
    }
}
