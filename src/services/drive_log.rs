//! Fire-and-forget external sink
//!
//! Log events and content archives go to an external collector endpoint
//! (a Google Apps Script web app in production). Every emission runs as a
//! detached task with its own error handling: sink failures are logged at
//! `warn` and swallowed, and can never affect the primary request.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::warn;

use crate::config::SinkConfig;

/// Severity of a sink log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLevel {
    Info,
    Warn,
    Error,
}

impl SinkLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SinkLevel::Info => "INFO",
            SinkLevel::Warn => "WARN",
            SinkLevel::Error => "ERROR",
        }
    }
}

struct Inner {
    http: reqwest::Client,
    url: String,
    auth_token: String,
    app_name: String,
}

/// Best-effort client for the external collector. Cloning is cheap; a
/// disabled logger (no sink configured) drops every event silently.
#[derive(Clone)]
pub struct DriveLogger {
    inner: Option<Arc<Inner>>,
}

impl DriveLogger {
    pub fn new(config: &SinkConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            inner: Some(Arc::new(Inner {
                http,
                url: config.url.clone(),
                auth_token: config.auth_token.clone(),
                app_name: config.app_name.clone(),
            })),
        }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Emit a structured log event. Returns immediately; delivery happens
    /// on a detached task.
    pub fn log(&self, level: SinkLevel, message: impl Into<String>, details: Option<Value>) {
        let Some(inner) = &self.inner else { return };

        let mut body = json!({
            "auth_token": inner.auth_token,
            "app_name": inner.app_name,
            "level": level.as_str(),
            "message": message.into(),
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        Self::send(Arc::clone(inner), body);
    }

    /// Archive a piece of generated content. Same fire-and-forget contract
    /// as [`log`](Self::log).
    pub fn archive(&self, content_type: &str, title: &str, content: &str) {
        let Some(inner) = &self.inner else { return };

        let body = json!({
            "auth_token": inner.auth_token,
            "app_name": inner.app_name,
            "action": "content",
            "content_type": content_type,
            "title": title,
            "content": content,
        });

        Self::send(Arc::clone(inner), body);
    }

    fn send(inner: Arc<Inner>, body: Value) {
        tokio::spawn(async move {
            match inner.http.post(&inner.url).json(&body).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "sink rejected log event");
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "failed to reach log sink");
                }
            }
        });
    }
}
