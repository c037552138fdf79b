use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// Every failure the dispatcher can produce is represented here and converted
/// into a structured JSON response at the handler boundary; nothing is allowed
/// to propagate past it as a panic.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Required configuration (bot token / recipient list) missing or empty.
    Config(String),
    /// One of the lead-field constraints was violated.
    Validation(String),
    /// The connectivity probe did not return the expected success marker.
    ProbeFailure(String),
    /// The warm-up send to the first recipient failed.
    PrimaryDeliveryFailure(String),
    /// One or more fan-out deliveries failed; carries the failing chat ids.
    PartialFanOut { failed: Vec<String> },
    /// Network fault after both the default and the fallback transport
    /// attempt were exhausted for a call.
    Transport(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::ProbeFailure(msg) => write!(f, "network probe failed: {}", msg),
            AppError::PrimaryDeliveryFailure(msg) => write!(f, "warmup send failed: {}", msg),
            AppError::PartialFanOut { failed } => {
                write!(f, "some sends failed ({} recipients)", failed.len())
            }
            AppError::Transport(msg) => write!(f, "transport error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every dispatcher failure maps to HTTP 400 with an `{ok: false, error}`
    /// body; a partial fan-out failure additionally carries the failing chat
    /// ids under `details`. Diagnostic detail is logged here, not sent to the
    /// caller: transport-class messages can embed request internals (the bot
    /// API URL carries the credential), so their bodies stay generic.
    fn into_response(self) -> Response {
        match &self {
            AppError::Config(msg) => {
                tracing::error!("❌ Configuration error: {}", msg);
                // Generic message: the caller cannot act on a config fault.
                error_body("service not configured")
            }
            AppError::Validation(msg) => {
                tracing::warn!("Rejected submission: {}", msg);
                error_body(msg)
            }
            AppError::ProbeFailure(msg) => {
                tracing::error!("❌ Network probe failed: {}", msg);
                error_body("network probe failed")
            }
            AppError::PrimaryDeliveryFailure(msg) => {
                tracing::error!("❌ Warmup send failed: {}", msg);
                error_body("warmup send failed")
            }
            AppError::PartialFanOut { failed } => {
                tracing::error!("❌ Telegram fails: {:?}", failed);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "ok": false,
                        "error": "some sends failed",
                        "details": failed,
                    })),
                )
                    .into_response()
            }
            AppError::Transport(msg) => {
                tracing::error!("❌ Transport error: {}", msg);
                error_body("network error")
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
                // Delegate to underlying error's response
                source.clone().into_response()
            }
        }
    }
}

fn error_body(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "ok": false,
            "error": message,
        })),
    )
        .into_response()
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    ///
    /// The URL is stripped first: for bot API calls its path segment carries
    /// the credential.
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.without_url().to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
