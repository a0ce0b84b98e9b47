//! Model backend abstraction
//!
//! The dispatcher drives providers through [`ModelBackend`], so the same
//! retry/fallback policy works regardless of which client library sits
//! behind it.

pub mod error;
pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::types::ApiRequest;

pub use error::ProviderError;
pub use gemini::{GeminiClient, GeminiConfig, GeminiErrorMapper};

/// One provider call per invocation, no retries of its own.
///
/// Implementations are stateless across invocations; the only side effect
/// is the outbound network call (and `speech` makes none at all).
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Backend name for routing and logging.
    fn name(&self) -> &'static str;

    /// Perform exactly one provider call for `model` and return the
    /// extracted text result.
    async fn invoke(&self, model: &str, request: &ApiRequest) -> Result<String, ProviderError>;
}

#[async_trait]
impl<B: ModelBackend + ?Sized> ModelBackend for Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn invoke(&self, model: &str, request: &ApiRequest) -> Result<String, ProviderError> {
        (**self).invoke(model, request).await
    }
}
