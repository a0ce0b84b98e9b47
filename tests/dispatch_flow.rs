//! Dispatcher flow tests
//!
//! Drives the retry/fallback state machine against a scripted backend and
//! checks the attempt accounting, fallback ordering, and backoff pacing.
//! The tokio clock is paused, so elapsed time measures exactly the backoff
//! the dispatcher slept.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use rokubun_gateway::core::dispatch::{Dispatcher, ModelChain, RetryPolicy};
use rokubun_gateway::core::provider::{ModelBackend, ProviderError};
use rokubun_gateway::core::types::{ApiRequest, GeneratePayload};

struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(script: impl IntoIterator<Item = Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for &ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn invoke(&self, model: &str, _request: &ApiRequest) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(model.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("backend invoked more often than scripted")
    }
}

fn request() -> ApiRequest {
    ApiRequest::GenerateContent(GeneratePayload {
        model: None,
        prompt: "今日の振り返り".to_string(),
        system_instruction: None,
        generation_config: None,
    })
}

fn overloaded() -> ProviderError {
    ProviderError::overloaded("scripted", "The model is overloaded")
}

fn chain_a_to_b() -> ModelChain {
    ModelChain::from_pairs([("model-a", "model-b")])
}

const BASE_MS: u64 = 100;

#[tokio::test(start_paused = true)]
async fn exhausts_both_models_then_fails_on_the_last() {
    let backend = ScriptedBackend::new((0..6).map(|_| Err(overloaded())));
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), chain_a_to_b());

    let error = dispatcher.dispatch(&request(), "model-a").await.unwrap_err();

    // Full budget on A, then full budget on B, terminal error names B.
    assert_eq!(error.model, "model-b");
    assert_eq!(error.attempts, 6);
    assert_eq!(
        backend.calls(),
        vec!["model-a", "model-a", "model-a", "model-b", "model-b", "model-b"]
    );
}

#[tokio::test(start_paused = true)]
async fn transient_backoff_is_linear_per_model() {
    let backend = ScriptedBackend::new((0..6).map(|_| Err(overloaded())));
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), chain_a_to_b());

    let start = Instant::now();
    let _ = dispatcher.dispatch(&request(), "model-a").await;

    // base×1 + base×2 on each model; the fallback edge itself sleeps nothing.
    assert_eq!(start.elapsed(), Duration::from_millis(2 * (BASE_MS + 2 * BASE_MS)));
}

#[tokio::test(start_paused = true)]
async fn success_on_second_attempt_never_reaches_fallback() {
    let backend = ScriptedBackend::new([Err(overloaded()), Ok("結果".to_string())]);
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), chain_a_to_b());

    let outcome = dispatcher.dispatch(&request(), "model-a").await.unwrap();

    assert_eq!(outcome.text, "結果");
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.model_used, "model-a");
    assert!(!outcome.used_fallback);
    assert_eq!(backend.calls(), vec!["model-a", "model-a"]);
}

#[tokio::test(start_paused = true)]
async fn fatal_failure_falls_back_with_zero_backoff() {
    let backend = ScriptedBackend::new([
        Err(ProviderError::authentication("scripted", "API key not valid")),
        Ok("代替モデルの結果".to_string()),
    ]);
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), chain_a_to_b());

    let start = Instant::now();
    let outcome = dispatcher.dispatch(&request(), "model-a").await.unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(outcome.model_used, "model-b");
    assert_eq!(outcome.attempts, 2);
    assert!(outcome.used_fallback);
}

#[tokio::test(start_paused = true)]
async fn empty_response_is_retried_as_transient() {
    let backend = ScriptedBackend::new([
        Err(ProviderError::empty_response("scripted")),
        Ok("今度は返ってきた".to_string()),
    ]);
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), ModelChain::new());

    let outcome = dispatcher.dispatch(&request(), "model-a").await.unwrap();

    assert_eq!(outcome.attempts, 2);
    assert_eq!(backend.calls(), vec!["model-a", "model-a"]);
}

#[tokio::test(start_paused = true)]
async fn no_fallback_configured_means_terminal_after_budget() {
    let backend = ScriptedBackend::new((0..3).map(|_| Err(overloaded())));
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), ModelChain::new());

    let error = dispatcher.dispatch(&request(), "model-a").await.unwrap_err();

    assert_eq!(error.model, "model-a");
    assert_eq!(error.attempts, 3);
    assert!(error.source.is_transient());
}

#[tokio::test(start_paused = true)]
async fn fallback_budget_is_independent_of_primary() {
    // A exhausts transiently, B fails twice then succeeds: B's budget was
    // not consumed by A's attempts.
    let backend = ScriptedBackend::new([
        Err(overloaded()),
        Err(overloaded()),
        Err(overloaded()),
        Err(overloaded()),
        Err(overloaded()),
        Ok("三度目の正直".to_string()),
    ]);
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), chain_a_to_b());

    let outcome = dispatcher.dispatch(&request(), "model-a").await.unwrap();

    assert_eq!(outcome.attempts, 6);
    assert_eq!(outcome.model_used, "model-b");
    assert!(outcome.used_fallback);
}

#[tokio::test(start_paused = true)]
async fn quota_exhaustion_counts_as_transient() {
    let backend = ScriptedBackend::new([
        Err(ProviderError::quota_exceeded("scripted", "RESOURCE_EXHAUSTED")),
        Ok("回復".to_string()),
    ]);
    let dispatcher = Dispatcher::new(&backend, RetryPolicy::new(3, BASE_MS), ModelChain::new());

    let outcome = dispatcher.dispatch(&request(), "model-a").await.unwrap();
    assert_eq!(outcome.attempts, 2);
}
