//! Unified provider error type
//!
//! One error enum for every backend so transient-vs-fatal classification
//! lives in a single predicate instead of substring checks scattered across
//! handlers.

use thiserror::Error;

/// Provider failure, normalized across backends.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Quota exhausted for {provider}: {message}")]
    QuotaExceeded {
        provider: &'static str,
        message: String,
    },

    #[error("Provider {provider} is overloaded: {message}")]
    Overloaded {
        provider: &'static str,
        message: String,
    },

    #[error("Deadline exceeded for {provider}: {message}")]
    DeadlineExceeded {
        provider: &'static str,
        message: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(
        provider: &'static str,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            provider,
            message: message.into(),
            retry_after,
        }
    }

    /// Create quota exhausted error
    pub fn quota_exceeded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            provider,
            message: message.into(),
        }
    }

    /// Create overloaded error
    pub fn overloaded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Overloaded {
            provider,
            message: message.into(),
        }
    }

    /// Create deadline exceeded error
    pub fn deadline_exceeded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::DeadlineExceeded {
            provider,
            message: message.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create empty response error
    pub fn empty_response(provider: &'static str) -> Self {
        Self::EmptyResponse { provider }
    }

    /// Create response parsing error
    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Whether this failure is expected to resolve with time or a different
    /// backend instance: overload, rate limit / quota exhaustion, deadline
    /// exceeded, or a missing result text.
    ///
    /// Structured status decides first; message substrings are the last
    /// resort for providers that only surface free-form errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Overloaded { .. }
            | Self::RateLimit { .. }
            | Self::QuotaExceeded { .. }
            | Self::DeadlineExceeded { .. }
            | Self::EmptyResponse { .. } => true,

            Self::ApiError {
                status, message, ..
            } => matches!(*status, 408 | 429 | 503 | 504) || message_looks_transient(message),

            Self::Authentication { .. }
            | Self::InvalidRequest { .. }
            | Self::Network { .. }
            | Self::ResponseParsing { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Coarse classification label for logs and sink events.
    pub fn status_hint(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "invalid-key",
            Self::RateLimit { .. } => "rate-limited",
            Self::QuotaExceeded { .. } => "quota-exhausted",
            Self::Overloaded { .. } => "overloaded",
            Self::DeadlineExceeded { .. } => "deadline-exceeded",
            Self::InvalidRequest { .. } => "bad-request",
            Self::Network { .. } => "network",
            Self::EmptyResponse { .. } => "empty-response",
            Self::ResponseParsing { .. } => "parse",
            Self::ApiError { .. } => "api-error",
            Self::Configuration { .. } => "config",
        }
    }

    /// Backend that produced this error.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::Overloaded { provider, .. }
            | Self::DeadlineExceeded { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::EmptyResponse { provider }
            | Self::ResponseParsing { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }
}

/// Substring heuristic over provider messages that carry no usable status.
fn message_looks_transient(message: &str) -> bool {
    const MARKERS: &[&str] = &[
        "overloaded",
        "busy",
        "UNAVAILABLE",
        "RESOURCE_EXHAUSTED",
        "DEADLINE_EXCEEDED",
        "503",
        "429",
    ];
    MARKERS.iter().any(|marker| message.contains(marker))
}
