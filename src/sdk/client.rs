//! Gateway HTTP client
//!
//! Thin wrapper over the gateway's single endpoint. Gateway failures become
//! user-facing messages here; a hosting timeout page (502/504 without a
//! JSON body) gets the product's timeout copy.

use serde::Deserialize;

use super::SdkError;
use crate::core::types::ApiRequest;

const MSG_TIMEOUT: &str = "通信がタイムアウトしました。もう一度お試しください。";
const MSG_CALL_FAILED: &str = "Failed to call gateway function";

#[derive(Debug, Deserialize)]
struct ResultBody {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the gateway wire protocol.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GatewayClient {
    /// `base_url` is the gateway origin, e.g. `https://rokubun.example.app`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/gemini", base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// Submit one request envelope and return the result text.
    pub async fn call(&self, request: &ApiRequest) -> Result<String, SdkError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(SdkError::Http)?;

        let status = response.status();
        if !status.is_success() {
            // The error body is JSON from the gateway, or an HTML page from
            // the hosting platform when the function itself timed out.
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error.unwrap_or_else(|| MSG_CALL_FAILED.to_string()),
                Err(_) if status.as_u16() == 502 || status.as_u16() == 504 => {
                    MSG_TIMEOUT.to_string()
                }
                Err(_) => MSG_CALL_FAILED.to_string(),
            };
            return Err(SdkError::Gateway { message });
        }

        let body: ResultBody = response
            .json()
            .await
            .map_err(|_| SdkError::Gateway {
                message: MSG_CALL_FAILED.to_string(),
            })?;

        Ok(body.result)
    }
}
