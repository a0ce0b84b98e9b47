//! Gemini client
//!
//! One `generateContent` call per invocation against the Google AI Studio
//! REST endpoint. Request bodies are built here from the gateway payloads;
//! classification of failures lives in [`GeminiErrorMapper`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::{Value, json};

use crate::core::provider::error::ProviderError;
use crate::core::provider::{GeminiErrorMapper, ModelBackend};
use crate::core::types::{ApiRequest, ChatPayload, GeneratePayload, TurnRole};

use super::config::GeminiConfig;

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| {
                ProviderError::configuration(
                    "gemini",
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Submit one `generateContent` request and extract the text result.
    async fn generate(&self, model: &str, body: Value) -> Result<String, ProviderError> {
        let url = self.config.endpoint(model, "generateContent");
        tracing::debug!(model, "sending generateContent request");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::deadline_exceeded("gemini", e.to_string())
                } else {
                    ProviderError::network("gemini", e.to_string())
                }
            })?;

        let json_response = self.handle_response(response).await?;
        Self::extract_text(&json_response)
    }

    async fn handle_response(&self, response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ProviderError::network("gemini", format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let json_response: Value = serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::response_parsing("gemini", format!("Invalid response JSON: {}", e))
        })?;

        if json_response.get("error").is_some() {
            return Err(GeminiErrorMapper::from_api_response(&json_response));
        }

        Ok(json_response)
    }

    /// Pull the text parts out of the first candidate.
    ///
    /// A candidate that finished abnormally maps through the error mapper;
    /// a well-formed response with no text is an `EmptyResponse`, which the
    /// dispatcher treats as retryable.
    fn extract_text(response: &Value) -> Result<String, ProviderError> {
        let text: String = response
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        if let Some(reason) = response
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
        {
            if reason != "STOP" {
                return Err(GeminiErrorMapper::from_finish_reason(reason));
            }
        }

        Err(ProviderError::empty_response("gemini"))
    }

    fn build_generate_body(payload: &GeneratePayload) -> Value {
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": payload.prompt }] }],
        });

        let cfg = payload.generation_config.clone().unwrap_or_default();
        let mut generation_config = json!({
            // The journaling client consumes structured output, so JSON is
            // the wire default unless the caller says otherwise.
            "responseMimeType": cfg
                .response_mime_type
                .as_deref()
                .unwrap_or("application/json"),
        });
        if let Some(schema) = &cfg.response_schema {
            generation_config["responseSchema"] = schema.clone();
        }
        if let Some(temperature) = cfg.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        body["generationConfig"] = generation_config;

        if let Some(instruction) = &payload.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        body
    }

    fn build_chat_body(payload: &ChatPayload) -> Value {
        // A conversation cannot open with a model turn; drop any leading
        // model entries before submission.
        let first_user = payload
            .history
            .iter()
            .position(|turn| turn.role == TurnRole::User)
            .unwrap_or(payload.history.len());

        let mut contents: Vec<Value> = payload.history[first_user..]
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                };
                json!({ "role": role, "parts": [{ "text": turn.text }] })
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": payload.message }] }));

        let mut body = json!({ "contents": contents });
        if let Some(instruction) = &payload.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        body
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn invoke(&self, model: &str, request: &ApiRequest) -> Result<String, ProviderError> {
        match request {
            ApiRequest::GenerateContent(payload) => {
                self.generate(model, Self::build_generate_body(payload)).await
            }
            ApiRequest::Chat(payload) => {
                self.generate(model, Self::build_chat_body(payload)).await
            }
            // Pass-through: no provider call in the minimal contract.
            ApiRequest::Speech(payload) => Ok(payload.text.clone()),
        }
    }
}
