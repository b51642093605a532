use std::collections::HashMap;

use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::errors::ErrorEnvelope;
use crate::core::metrics;
use crate::core::redis::RedisHealth;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::{HealthResponse, RootResponse};

const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred";
const NOT_FOUND_MESSAGE: &str = "Page not found - The requested resource does not exist";

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    Json(RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        api_prefix: api.prefix.clone(),
    })
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy".to_string();
    let mut components = HashMap::new();

    match state.redis().health().await {
        RedisHealth::Healthy => {
            components.insert("redis".to_string(), "healthy".to_string());
        }
        RedisHealth::Disconnected => {
            components.insert("redis".to_string(), "disconnected".to_string());
        }
        RedisHealth::Unhealthy(error) => {
            components.insert("redis".to_string(), format!("unhealthy: {error}"));
            status = "degraded".to_string();
        }
    }

    match repositories::health::ping(state.db()).await {
        Ok(()) => {
            components.insert("database".to_string(), "healthy".to_string());
        }
        Err(err) => {
            components.insert("database".to_string(), format!("unhealthy: {err}"));
            status = "unhealthy".to_string();
        }
    }

    Json(HealthResponse { service: "lms-backend".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorPageQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Generic error payload for clients redirected here; the status mirrors `code`.
pub(crate) async fn error_page(Query(query): Query<ErrorPageQuery>) -> impl IntoResponse {
    let status = error_page_status(query.code.as_deref());
    let message = query
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    (status, Json(ErrorEnvelope::new(status, message, None)))
}

/// Missing, unparseable or non-error codes collapse to 500.
fn error_page_status(code: Option<&str>) -> StatusCode {
    code.and_then(|raw| raw.trim().parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let status = StatusCode::NOT_FOUND;
    (status, Json(ErrorEnvelope::new(status, NOT_FOUND_MESSAGE.to_string(), Some(uri.to_string()))))
}
