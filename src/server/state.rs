//! Application state shared across HTTP handlers

use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::core::dispatch::Dispatcher;
use crate::core::provider::{GeminiClient, GeminiConfig, ModelBackend};
use crate::services::DriveLogger;

/// Shared per-process resources. The dispatcher holds no per-request state,
/// so one instance serves every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` until the provider credential is configured; handlers turn
    /// that into a per-request 500.
    pub dispatcher: Option<Arc<Dispatcher<Arc<dyn ModelBackend>>>>,
    pub logger: DriveLogger,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let logger = match &config.sink {
            Some(sink) => DriveLogger::new(sink),
            None => DriveLogger::disabled(),
        };

        let dispatcher = config.gemini_api_key.as_ref().and_then(|api_key| {
            let mut gemini_config = GeminiConfig::new(api_key.clone());
            if let Some(base) = &config.gemini_api_base {
                gemini_config = gemini_config.with_api_base(base.clone());
            }

            match GeminiClient::new(gemini_config) {
                Ok(client) => {
                    let backend: Arc<dyn ModelBackend> = Arc::new(client);
                    Some(Arc::new(Dispatcher::new(
                        backend,
                        config.retry.clone(),
                        config.model_chain.clone(),
                    )))
                }
                Err(error) => {
                    warn!(%error, "failed to initialize Gemini backend");
                    None
                }
            }
        });

        Self {
            config: Arc::new(config),
            dispatcher,
            logger,
        }
    }
}
