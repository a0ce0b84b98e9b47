//! Journal AI facade
//!
//! Builds the domain prompts, calls the gateway, and parses structured
//! output. Decorative features (souvenir image, parallel story, chat
//! extraction) degrade to `None` on failure instead of failing the user's
//! action; feedback and chat propagate errors so the UI can show a message.

use tracing::warn;

use super::client::GatewayClient;
use super::journal::{AiFeedback, DailyLog, EveningEntry, ParallelStory, Personality};
use super::{SdkError, prompts};
use crate::core::types::{
    ApiRequest, ChatPayload, ChatTurn, GenerationConfig, GeneratePayload, TurnRole,
};

/// Model the facade pins for its calls; the gateway's chain still applies
/// behind it.
const FACADE_MODEL: &str = "gemini-3-flash-preview";

/// High-level journaling operations over the gateway.
#[derive(Debug, Clone)]
pub struct JournalAi {
    client: GatewayClient,
}

impl JournalAi {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Generate the structured daily feedback for one diary entry.
    pub async fn generate_daily_feedback(
        &self,
        log: &DailyLog,
        personality: Personality,
        history: &[DailyLog],
    ) -> Result<AiFeedback, SdkError> {
        let request = ApiRequest::GenerateContent(GeneratePayload {
            model: Some(FACADE_MODEL.to_string()),
            prompt: prompts::feedback_prompt(log, personality, history),
            system_instruction: Some(prompts::feedback_instruction(personality).to_string()),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompts::feedback_schema()),
                temperature: Some(1.1),
            }),
        });

        let text = self.client.call(&request).await?;
        serde_json::from_str(&text).map_err(SdkError::Extraction)
    }

    /// Generate a souvenir image for the day. `None` when the day has no
    /// evening entry or the feature fails this round.
    pub async fn generate_souvenir_image(&self, log: &DailyLog) -> Option<String> {
        let prompt = prompts::souvenir_prompt(log)?;
        let request = ApiRequest::GenerateContent(GeneratePayload {
            model: Some(FACADE_MODEL.to_string()),
            prompt,
            system_instruction: None,
            generation_config: None,
        });

        match self.client.call(&request).await {
            Ok(image) => Some(image),
            Err(error) => {
                warn!(%error, "souvenir image generation unavailable");
                None
            }
        }
    }

    /// Generate the parallel-world story. Degrades to `None` on transport
    /// or extraction failure.
    pub async fn generate_parallel_story(&self, log: &DailyLog) -> Option<ParallelStory> {
        let prompt = prompts::parallel_story_prompt(log)?;
        let request = ApiRequest::GenerateContent(GeneratePayload {
            model: Some(FACADE_MODEL.to_string()),
            prompt,
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompts::parallel_world_schema()),
                temperature: Some(1.3),
            }),
        });

        match self.structured_call(&request).await {
            Ok(story) => Some(story),
            Err(error) => {
                warn!(%error, "parallel story unavailable");
                None
            }
        }
    }

    /// Continue the evening chat. `messages` is the full conversation, the
    /// last turn being the user's current message.
    pub async fn generate_chat_reply(
        &self,
        messages: &[ChatTurn],
        personality: Personality,
    ) -> Result<String, SdkError> {
        let (current, history) = match messages.split_last() {
            Some(split) => split,
            None => {
                return Err(SdkError::Gateway {
                    message: "empty conversation".to_string(),
                });
            }
        };

        // The gateway strips these too; doing it here keeps the wire
        // payload valid even against older deployments.
        let first_user = history
            .iter()
            .position(|turn| turn.role == TurnRole::User)
            .unwrap_or(history.len());

        let request = ApiRequest::Chat(ChatPayload {
            model: Some(FACADE_MODEL.to_string()),
            message: current.text.clone(),
            history: history[first_user..].to_vec(),
            system_instruction: Some(prompts::chat_instruction(personality)),
        });

        self.client.call(&request).await
    }

    /// Extract a structured diary entry from the chat transcript. Degrades
    /// to `None` — the user can always fill the form by hand.
    pub async fn extract_log_from_chat(&self, messages: &[ChatTurn]) -> Option<EveningEntry> {
        let request = ApiRequest::GenerateContent(GeneratePayload {
            model: Some(FACADE_MODEL.to_string()),
            prompt: prompts::extraction_prompt(messages),
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompts::evening_entry_schema()),
                temperature: None,
            }),
        });

        match self.structured_call(&request).await {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "chat extraction unavailable");
                None
            }
        }
    }

    /// Call the gateway and parse the result text as `T`.
    async fn structured_call<T: serde::de::DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, SdkError> {
        let text = self.client.call(request).await?;
        serde_json::from_str(&text).map_err(SdkError::Extraction)
    }
}
