//! Client-side SDK
//!
//! Everything the journaling client needs: the gateway HTTP client, the
//! diary domain model, prompt construction, the high-level facade, and
//! local persistence. Ships in the same crate as the server so the wire
//! types stay in lockstep.

pub mod client;
pub mod journal;
pub mod prompts;
pub mod service;
pub mod store;

pub use client::GatewayClient;
pub use journal::{
    AiFeedback, DailyLog, EveningEntry, MorningEntry, ParallelStory, Personality, UserSettings,
};
pub use service::JournalAi;
pub use store::{BlobStore, JournalStore, StoreError};

use thiserror::Error;

/// Failures surfaced by the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport failure before the gateway answered.
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with an error; `message` is user-facing.
    #[error("{message}")]
    Gateway { message: String },

    /// Structured output did not parse as the agreed schema. Callers treat
    /// this as "feature unavailable this round", not as fatal.
    #[error("structured output did not parse: {0}")]
    Extraction(#[source] serde_json::Error),
}
