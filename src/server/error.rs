//! Gateway-level errors and their HTTP rendering
//!
//! Every failure a handler can produce renders as the wire error body
//! `{"error": <user-facing>, "details"?: <technical>}` with the matching
//! status code. User-facing strings are the product's Japanese copy,
//! chosen per failure class so operator faults are not masked behind a
//! generic message.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::core::dispatch::DispatchError;
use crate::core::provider::ProviderError;

/// Credential missing on the server (deployment fault, never retried).
pub const MSG_MISSING_CREDENTIAL: &str = "APIキーが設定されていません (Server Config Error)";
/// Provider congestion: the whole retry/fallback chain came up empty.
pub const MSG_PROVIDER_BUSY: &str = "AIが混み合っています。しばらくしてからもう一度お試しください。";
/// Credential rejected by the provider.
pub const MSG_PROVIDER_AUTH: &str = "APIキーが無効です。サーバー設定を確認してください。";
/// Everything else.
pub const MSG_PROVIDER_FAILED: &str = "AIとの通信に失敗しました。時間をおいてもう一度お試しください。";

/// Failures surfaced by the HTTP boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed request: bad JSON, missing fields, unknown action.
    #[error("{0}")]
    BadRequest(String),

    /// Anything but POST on an API resource.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Server-side credential is unconfigured.
    #[error("server API credential is not configured")]
    MissingCredential,

    /// The dispatcher exhausted its whole chain.
    #[error("dispatch failed: {details}")]
    Dispatch {
        /// Localized, classification-derived message for the user.
        message: &'static str,
        /// Underlying technical message for diagnostics.
        details: String,
    },
}

impl GatewayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Map a terminal dispatch failure, deriving the user-facing message
    /// from the failure classification.
    pub fn from_dispatch(error: &DispatchError) -> Self {
        let message = match &error.source {
            ProviderError::Authentication { .. } => MSG_PROVIDER_AUTH,
            source if source.is_transient() => MSG_PROVIDER_BUSY,
            _ => MSG_PROVIDER_FAILED,
        };

        Self::Dispatch {
            message,
            details: error.source.to_string(),
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::MissingCredential => MSG_MISSING_CREDENTIAL.to_string(),
            Self::Dispatch { message, .. } => (*message).to_string(),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingCredential | Self::Dispatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "error": self.user_message() });
        if let Self::Dispatch { details, .. } = self {
            body["details"] = json!(details);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ProviderError;

    fn dispatch_error(source: ProviderError) -> DispatchError {
        DispatchError {
            model: "gemini-2.0-flash".to_string(),
            attempts: 6,
            source,
        }
    }

    #[test]
    fn transient_exhaustion_reads_as_busy() {
        let error =
            GatewayError::from_dispatch(&dispatch_error(ProviderError::overloaded("gemini", "x")));
        match error {
            GatewayError::Dispatch { message, .. } => assert_eq!(message, MSG_PROVIDER_BUSY),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn auth_failure_names_the_credential() {
        let error = GatewayError::from_dispatch(&dispatch_error(ProviderError::authentication(
            "gemini", "bad key",
        )));
        match error {
            GatewayError::Dispatch { message, .. } => assert_eq!(message, MSG_PROVIDER_AUTH),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn status_codes_match_the_protocol() {
        assert_eq!(
            GatewayError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GatewayError::MissingCredential.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
