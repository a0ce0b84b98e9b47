//! Gemini backend configuration

/// Connection settings for the Google AI Studio endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, passed as a query parameter (AI Studio convention).
    pub api_key: String,
    /// Base URL without a trailing slash.
    pub api_base: String,
    /// Whole-request timeout in seconds.
    pub request_timeout: u64,
    /// Connect timeout in seconds.
    pub connect_timeout: u64,
}

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: 60,
            connect_timeout: 10,
        }
    }

    /// Override the endpoint base, e.g. for a mock server in tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Full URL for an operation on a model.
    pub fn endpoint(&self, model: &str, operation: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.api_base.trim_end_matches('/'),
            model,
            operation,
            self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_builds_model_url() {
        let config = GeminiConfig::new("secret").with_api_base("http://localhost:9090/v1beta/");
        assert_eq!(
            config.endpoint("gemini-2.0-flash", "generateContent"),
            "http://localhost:9090/v1beta/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }
}
