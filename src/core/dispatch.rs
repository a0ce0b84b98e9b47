//! Retry/fallback dispatch
//!
//! Wraps a [`ModelBackend`] call with bounded retries on transient failures
//! and model fallback on exhaustion. Per logical request the state is the
//! pair `(current model, attempt number)`; the loop in [`Dispatcher::dispatch`]
//! is the whole machine, kept iterative so it stays inspectable and stack-safe.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::provider::{ModelBackend, ProviderError};
use crate::core::types::ApiRequest;

/// Retry budget and pacing for a single model.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts granted to each model before falling back.
    pub max_attempts_per_model: u32,
    /// Base delay; attempt `n` waits `base × n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts_per_model: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts_per_model: max_attempts_per_model.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Linear backoff. Provider overload windows are short in practice, so
    /// the dispatcher favors a fast fallback over long waits on one model.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, 1000)
    }
}

/// Static model-to-fallback mapping, read-only at request time.
///
/// Must not contain a cycle: the dispatcher walks the chain without cycle
/// detection, so a model that transitively falls back to itself is an
/// operator configuration error.
#[derive(Debug, Clone, Default)]
pub struct ModelChain {
    chain: HashMap<String, String>,
}

impl ModelChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            chain: pairs
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        }
    }

    /// Parse a `primary=fallback,primary2=fallback2` spec, as accepted from
    /// the environment. Malformed entries are skipped with a warning.
    pub fn parse(spec: &str) -> Self {
        let mut chain = HashMap::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
                    chain.insert(from.trim().to_string(), to.trim().to_string());
                }
                _ => warn!(entry, "ignoring malformed model chain entry"),
            }
        }
        Self { chain }
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.chain.insert(from.into(), to.into());
    }

    pub fn fallback_for(&self, model: &str) -> Option<&str> {
        self.chain.get(model).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Successful dispatch plus execution metadata.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub text: String,
    /// Model that actually produced the text (differs from the requested
    /// model when fallback occurred).
    pub model_used: String,
    /// Total attempts across all models.
    pub attempts: u32,
    pub used_fallback: bool,
}

/// Terminal dispatch failure.
#[derive(Debug, Error)]
#[error("dispatch failed on model {model} after {attempts} attempt(s): {source}")]
pub struct DispatchError {
    /// Final model attempted.
    pub model: String,
    /// Total attempts across all models.
    pub attempts: u32,
    #[source]
    pub source: ProviderError,
}

/// Makes a [`ModelBackend`] resilient to transient provider failures.
///
/// Callers see only the final outcome; retries and fallback transitions are
/// internal and strictly sequential — never two provider calls in flight
/// for the same request.
pub struct Dispatcher<B> {
    backend: B,
    policy: RetryPolicy,
    chain: ModelChain,
}

impl<B: ModelBackend> Dispatcher<B> {
    pub fn new(backend: B, policy: RetryPolicy, chain: ModelChain) -> Self {
        Self {
            backend,
            policy,
            chain,
        }
    }

    /// Run `request` against `requested_model`, retrying transient failures
    /// up to the per-model budget and walking the fallback chain on
    /// exhaustion or fatal failure. Each fallback model gets a fresh budget:
    /// a different model has an independent capacity pool, so failures on
    /// one say nothing about the other.
    pub async fn dispatch(
        &self,
        request: &ApiRequest,
        requested_model: &str,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut model = requested_model.to_string();
        let mut attempt: u32 = 1;
        let mut total_attempts: u32 = 0;
        let mut used_fallback = false;

        loop {
            total_attempts += 1;
            debug!(
                backend = self.backend.name(),
                model = %model,
                attempt,
                action = request.action(),
                "invoking backend"
            );

            let error = match self.backend.invoke(&model, request).await {
                Ok(text) => {
                    return Ok(DispatchOutcome {
                        text,
                        model_used: model,
                        attempts: total_attempts,
                        used_fallback,
                    });
                }
                Err(error) => error,
            };

            let transient = error.is_transient();
            warn!(
                model = %model,
                attempt,
                transient,
                hint = error.status_hint(),
                error = %error,
                "backend call failed"
            );

            if transient && attempt < self.policy.max_attempts_per_model {
                sleep(self.policy.backoff_for_attempt(attempt)).await;
                attempt += 1;
                continue;
            }

            // Budget exhausted, or fatal: fall back. Fatal failures reach
            // here on attempt 1, so no backoff delay is ever slept for them.
            match self.chain.fallback_for(&model) {
                Some(next) if next != model => {
                    info!(from = %model, to = next, "falling back to alternate model");
                    model = next.to_string();
                    attempt = 1;
                    used_fallback = true;
                }
                _ => {
                    return Err(DispatchError {
                        model,
                        attempts: total_attempts,
                        source: error,
                    });
                }
            }
        }
    }
}
