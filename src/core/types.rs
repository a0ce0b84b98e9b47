//! Wire types for the gateway protocol
//!
//! The client talks to the gateway through a single envelope: an `action`
//! discriminator plus an action-specific `payload`. The envelope is an
//! adjacently tagged enum, so an unrecognized action fails deserialization
//! at the boundary and never reaches the dispatcher.

use serde::{Deserialize, Serialize};

/// Inbound request envelope.
///
/// Wire shape: `{"action": "generateContent"|"chat"|"speech", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload")]
pub enum ApiRequest {
    /// Single-turn content generation.
    #[serde(rename = "generateContent")]
    GenerateContent(GeneratePayload),
    /// Multi-turn chat continuation.
    #[serde(rename = "chat")]
    Chat(ChatPayload),
    /// Speech pass-through (no provider call).
    #[serde(rename = "speech")]
    Speech(SpeechPayload),
}

impl ApiRequest {
    /// Action name as it appears on the wire, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::GenerateContent(_) => "generateContent",
            ApiRequest::Chat(_) => "chat",
            ApiRequest::Speech(_) => "speech",
        }
    }

    /// Model override carried by the payload, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            ApiRequest::GenerateContent(p) => p.model.as_deref(),
            ApiRequest::Chat(p) => p.model.as_deref(),
            ApiRequest::Speech(_) => None,
        }
    }
}

/// Payload for `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePayload {
    /// Model override; the gateway substitutes its default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The single user turn to submit.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Generation tuning forwarded to the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type the response must use. Defaults to `application/json`
    /// at the adapter (the client relies on structured output).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Structural schema the response must conform to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Payload for `chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The final user turn.
    pub message: String,
    /// Prior turns, oldest first. Leading `model` turns are dropped before
    /// submission: a conversation cannot validly open with a model turn.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

/// One prior turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        ChatTurn {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        ChatTurn {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// Payload for `speech`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechPayload {
    /// Text returned unchanged by the adapter.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_roundtrip() {
        let body = json!({
            "action": "generateContent",
            "payload": {
                "model": "gemini-3-flash-preview",
                "prompt": "今日の日記",
                "generationConfig": { "temperature": 1.1 }
            }
        });

        let request: ApiRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.action(), "generateContent");
        assert_eq!(request.model(), Some("gemini-3-flash-preview"));

        let back = serde_json::to_value(&request).unwrap();
        assert_eq!(back["action"], "generateContent");
        assert_eq!(back["payload"]["prompt"], "今日の日記");
    }

    #[test]
    fn unknown_action_is_rejected() {
        let body = json!({ "action": "dance", "payload": { "text": "x" } });
        assert!(serde_json::from_value::<ApiRequest>(body).is_err());
    }

    #[test]
    fn chat_history_defaults_empty() {
        let body = json!({
            "action": "chat",
            "payload": { "message": "こんにちは" }
        });
        let request: ApiRequest = serde_json::from_value(body).unwrap();
        match request {
            ApiRequest::Chat(p) => assert!(p.history.is_empty()),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn speech_has_no_model() {
        let body = json!({ "action": "speech", "payload": { "text": "読み上げ" } });
        let request: ApiRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.model(), None);
    }
}
