use crate::config::Config;
use crate::dispatcher::LeadDispatcher;
use crate::errors::AppError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Read-only for the whole process lifetime; loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The notification dispatcher.
    pub dispatcher: LeadDispatcher,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-notify-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/telegram/apply
///
/// Forwards a lead-capture form submission to the configured Telegram
/// recipients. The body is taken untyped; the dispatcher owns parsing,
/// validation and delivery, and every failure comes back as a structured
/// `{ok: false, ...}` response via [`AppError`], including a body that is
/// not JSON at all, which would otherwise surface as axum's plain-text
/// rejection.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The raw JSON form payload.
///
/// # Returns
///
/// * `Result<Json<Value>, AppError>` - `{ok: true}` when every recipient was
///   reached.
pub async fn apply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload
        .map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?;

    tracing::info!(
        "POST /api/telegram/apply ({} recipients configured)",
        state.config.telegram_chat_ids.len()
    );

    let ack = state.dispatcher.submit(payload).await?;

    tracing::debug!("Dispatch acknowledged: {} recipients", ack.delivered);
    Ok(Json(json!({ "ok": true })))
}
