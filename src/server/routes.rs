//! HTTP route handlers
//!
//! The protocol is deliberately narrow: one POST endpoint for AI calls, one
//! for content archival, a health probe, and explicit OPTIONS/405 handling
//! on the API resources.

use actix_web::{HttpResponse, http::Method, web};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::core::types::ApiRequest;
use crate::server::error::GatewayError;
use crate::server::state::AppState;
use crate::services::SinkLevel;

/// Wire routes onto the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::resource("/api/gemini")
                .route(web::post().to(generate))
                .route(web::route().method(Method::OPTIONS).to(preflight))
                .route(web::route().to(method_not_allowed)),
        )
        .service(
            web::resource("/api/content")
                .route(web::post().to(save_content))
                .route(web::route().method(Method::OPTIONS).to(preflight))
                .route(web::route().to(method_not_allowed)),
        );
}

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Pre-flight support: 200 with an empty body.
async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn method_not_allowed() -> Result<HttpResponse, GatewayError> {
    Err(GatewayError::MethodNotAllowed)
}

/// AI call endpoint: validate the envelope, check the credential, dispatch,
/// map the outcome. Sink events bracket the dispatch and are fire-and-forget.
async fn generate(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let request = parse_request(&body)?;

    let Some(dispatcher) = state.dispatcher.as_ref() else {
        error!("GEMINI_API_KEY is not configured");
        return Err(GatewayError::MissingCredential);
    };

    let model = request
        .model()
        .unwrap_or(&state.config.default_model)
        .to_string();

    info!(action = request.action(), model = %model, "dispatching AI call");
    state.logger.log(
        SinkLevel::Info,
        format!("API呼出: {}", request.action()),
        Some(json!({ "model": model })),
    );

    match dispatcher.dispatch(&request, &model).await {
        Ok(outcome) => {
            info!(
                model_used = %outcome.model_used,
                attempts = outcome.attempts,
                used_fallback = outcome.used_fallback,
                "dispatch succeeded"
            );
            state.logger.log(
                SinkLevel::Info,
                format!("API成功: {}", request.action()),
                Some(json!({ "model": outcome.model_used, "attempts": outcome.attempts })),
            );

            Ok(HttpResponse::Ok().json(json!({ "result": outcome.text })))
        }
        Err(dispatch_error) => {
            error!(
                model = %dispatch_error.model,
                attempts = dispatch_error.attempts,
                error = %dispatch_error.source,
                "dispatch exhausted"
            );
            state.logger.log(
                SinkLevel::Error,
                format!("API失敗: {}", request.action()),
                Some(json!({
                    "model": dispatch_error.model,
                    "attempts": dispatch_error.attempts,
                    "error": dispatch_error.source.to_string(),
                })),
            );

            Err(GatewayError::from_dispatch(&dispatch_error))
        }
    }
}

/// Parse the request envelope, distinguishing the protocol faults the
/// client can act on: empty body, invalid JSON, missing fields, unknown
/// action or malformed payload.
fn parse_request(body: &[u8]) -> Result<ApiRequest, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::bad_request("Missing request body"));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| GatewayError::bad_request("Invalid JSON body"))?;

    if value.get("action").is_none() || value.get("payload").is_none() {
        return Err(GatewayError::bad_request("Missing action or payload"));
    }

    serde_json::from_value(value)
        .map_err(|e| GatewayError::bad_request(format!("Unsupported request: {}", e)))
}

/// Archival record from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveContentRequest {
    content_type: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

/// Content archival endpoint: forwards to the sink and acknowledges without
/// waiting for delivery.
async fn save_content(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let request: SaveContentRequest = serde_json::from_slice(&body)
        .map_err(|_| GatewayError::bad_request("Invalid JSON body"))?;

    let (Some(content_type), Some(title), Some(content)) =
        (&request.content_type, &request.title, &request.content)
    else {
        return Err(GatewayError::bad_request("Missing required fields"));
    };
    if content_type.is_empty() || title.is_empty() || content.is_empty() {
        return Err(GatewayError::bad_request("Missing required fields"));
    }

    state.logger.archive(content_type, title, content);

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_body() {
        let error = parse_request(b"").unwrap_err();
        assert!(matches!(error, GatewayError::BadRequest(_)));
    }

    #[test]
    fn parse_rejects_missing_payload() {
        let error = parse_request(br#"{"action":"chat"}"#).unwrap_err();
        match error {
            GatewayError::BadRequest(message) => {
                assert_eq!(message, "Missing action or payload")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_unknown_action() {
        let error =
            parse_request(br#"{"action":"dance","payload":{"text":"x"}}"#).unwrap_err();
        assert!(matches!(error, GatewayError::BadRequest(_)));
    }

    #[test]
    fn parse_accepts_speech() {
        let request = parse_request(r#"{"action":"speech","payload":{"text":"声"}}"#.as_bytes()).unwrap();
        assert_eq!(request.action(), "speech");
    }
}
