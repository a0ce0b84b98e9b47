//! # Rokubun AI Gateway
//!
//! Backend for the Rokubun journaling app: a small HTTP gateway that
//! forwards diary-driven AI calls to a generative-model provider and
//! recovers from transient provider failures with bounded retries and a
//! static model fallback chain.
//!
//! ## Layers
//!
//! - **core**: wire types, the [`ModelBackend`] capability seam, the Gemini
//!   adapter, and the retry/fallback [`Dispatcher`].
//! - **server**: the actix-web gateway — protocol validation, credential
//!   check, dispatch, HTTP mapping, best-effort sink events.
//! - **sdk**: the client side — domain prompts, structured-output parsing,
//!   and local persistence.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rokubun_gateway::{Config, server::HttpServer};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = Config::from_env();
//!     HttpServer::new(config).start().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod sdk;
pub mod server;
pub mod services;

pub use config::Config;
pub use core::dispatch::{DispatchError, DispatchOutcome, Dispatcher, ModelChain, RetryPolicy};
pub use core::provider::{GeminiClient, GeminiConfig, ModelBackend, ProviderError};
pub use core::types::{
    ApiRequest, ChatPayload, ChatTurn, GeneratePayload, GenerationConfig, SpeechPayload, TurnRole,
};
