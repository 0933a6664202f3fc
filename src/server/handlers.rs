// HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::FutureExt;
use serde::Deserialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::security_headers;
use super::CopyServer;
use crate::config::constants::{GENERATE_PATH, MAX_BODY_BYTES};
use crate::error::{ApiError, TopicError};
use crate::fallback::{FallbackReason, ResponseEnvelope};
use crate::prompt::Topic;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

/// Build the application router with all layers applied.
pub fn create_router(server: Arc<CopyServer>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(health_check))
        .route(GENERATE_PATH, post(handle_generate))
        .fallback(handle_not_found)
        .with_state(server)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
}

/// Demo page with the topic form
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check(State(server): State<Arc<CopyServer>>) -> impl IntoResponse {
    let orchestrator = server.orchestrator();
    Json(serde_json::json!({
        "status": "ok",
        "primaryConfigured": orchestrator.has_primary(),
        "secondaryConfigured": orchestrator.has_secondary(),
    }))
}

pub async fn handle_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
        .into_response()
}

/// Generate marketing copy for a topic
pub async fn handle_generate(
    State(server): State<Arc<CopyServer>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::PayloadTooLarge);
        }
        Err(rejection) => {
            tracing::debug!("Rejected generate body: {}", rejection.body_text());
            return Err(TopicError::Empty.into());
        }
    };

    let topic = Topic::parse(request.topic.as_deref().unwrap_or_default())?;
    tracing::debug!(topic = %topic, "Generate request");

    let orchestrator = server.orchestrator();
    match AssertUnwindSafe(orchestrator.generate(&topic))
        .catch_unwind()
        .await
    {
        Ok(envelope) => Ok(Json(envelope)),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(topic = %topic, "Orchestration failed unexpectedly: {}", message);
            Err(ApiError::Internal {
                message,
                fallback: Box::new(ResponseEnvelope::templated(
                    orchestrator.company(),
                    &topic,
                    FallbackReason::ServerError,
                )),
            })
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown internal error".to_string()
    }
}
