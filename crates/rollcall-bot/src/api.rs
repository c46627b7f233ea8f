use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::dispatch::Bot;
use crate::error::BotError;
use crate::platform::ChatPlatform;
use crate::telegram::Update;

/// Header Telegram echoes back with the secret given to `setWebhook`.
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

pub struct AppState<P> {
    pub bot: Arc<Bot<P>>,
    pub webhook_secret: Option<Arc<str>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            webhook_secret: self.webhook_secret.clone(),
        }
    }
}

pub fn build_router<P: ChatPlatform>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", post(webhook::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept an update and handle it in the background so Telegram gets its
/// 200 right away.  Per-group ordering is restored by the group locks.
async fn webhook<P: ChatPlatform>(
    headers: HeaderMap,
    State(state): State<AppState<P>>,
    Json(update): Json<Update>,
) -> Result<(), BotError> {
    verify_secret(&headers, state.webhook_secret.as_deref())?;

    debug!(update_id = update.update_id, "Webhook update received");
    let bot = state.bot.clone();
    tokio::spawn(async move { bot.handle_update(update).await });
    Ok(())
}

fn verify_secret(headers: &HeaderMap, expected: Option<&str>) -> Result<(), BotError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let given = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    use subtle::ConstantTimeEq;
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    if given.len() != expected.len() || given.ct_eq(expected).unwrap_u8() != 1 {
        return Err(BotError::Forbidden("Invalid webhook secret".into()));
    }

    Ok(())
}

pub async fn serve<P: ChatPlatform>(
    state: AppState<P>,
    addr: std::net::SocketAddr,
) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting webhook listener");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
