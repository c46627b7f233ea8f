use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rollcall_engine::EngineError;
use thiserror::Error;

/// Failure of a single Bot API call.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The API answered `ok: false`.
    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API call timed out")]
    Timeout,

    #[error("Unexpected Bot API response: {0}")]
    Decode(String),
}

impl PlatformError {
    /// Whether the bot lacks the admin right the call needed.
    pub fn is_missing_rights(&self) -> bool {
        match self {
            PlatformError::Api { description, .. } => {
                let description = description.to_ascii_lowercase();
                description.contains("rights") || description.contains("not enough")
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    /// Malformed command argument; the message is shown to the admin.
    #[error("{0}")]
    Input(String),

    #[error("Only admins can use this command.")]
    Unauthorized,

    #[error("This command can only be used in a group where I am an admin.")]
    NotAdminContext,

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl BotError {
    /// Text replied to the invoking actor, if the error is theirs to see.
    pub fn user_message(&self) -> Option<String> {
        match self {
            BotError::Input(msg) => Some(format!("⚠️ {msg}")),
            BotError::Unauthorized | BotError::NotAdminContext => Some(format!("⚠️ {self}")),
            BotError::Platform(e) if e.is_missing_rights() => Some(
                "⚠️ I need admin rights (restrict members / change group info) to do that."
                    .to_string(),
            ),
            BotError::Engine(EngineError::InvalidDuration(_)) => {
                Some("⚠️ Invalid duration format. Use 1d, 2h, 30m etc.".to_string())
            }
            BotError::Engine(EngineError::InvalidTarget(_)) => Some(
                "⚠️ Error: Target ID must be a valid group ID (e.g., -100123456).".to_string(),
            ),
            _ => None,
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            BotError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            BotError::Input(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
