//! Gemini backend
//!
//! Google AI Studio `generateContent` adapter behind [`ModelBackend`].
//!
//! [`ModelBackend`]: crate::core::provider::ModelBackend

pub mod client;
pub mod config;
pub mod error;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiErrorMapper;
