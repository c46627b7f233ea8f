//! # rollcall-bot
//!
//! Telegram bot that runs engagement sessions in group chats.
//!
//! This binary provides:
//! - **Webhook listener** (axum) that receives Telegram updates
//! - **Admin commands** for opening, tracking, listing, muting and closing
//!   sessions
//! - **Passive tracking** of post links, completion phrases and screen
//!   recordings
//! - **Group connections** so several chats can share one session

mod api;
mod commands;
mod config;
mod dispatch;
mod error;
mod events;
mod format;
mod group_locks;
mod handlers;
mod platform;
mod telegram;

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use rollcall_store::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::BotConfig;
use crate::dispatch::Bot;
use crate::telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,rollcall_bot=debug,rollcall_engine=debug,rollcall_store=info")
        }))
        .init();

    info!("Starting rollcall bot v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = BotConfig::from_env();
    info!(?config, "Loaded configuration");
    if config.bot_token.is_empty() {
        bail!("BOT_TOKEN is not set");
    }

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------
    let db = open_database(&config)?;

    let client = TelegramClient::new(&config)?;
    if let Some(url) = &config.webhook_url {
        client
            .set_webhook(url, config.webhook_secret.as_deref())
            .await?;
    }

    let http_addr = config.http_addr;
    let webhook_secret = config.webhook_secret.as_deref().map(Arc::from);
    let bot = Arc::new(Bot::new(client, db, Arc::new(config)));

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Periodic group lock cleanup (every 5 minutes, drop locks idle >10 min)
    let locks = bot.locks().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            locks.purge_idle(Duration::from_secs(600)).await;
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the webhook listener (blocks until shutdown)
    // -----------------------------------------------------------------------
    let app_state = AppState { bot, webhook_secret };
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

fn open_database(config: &BotConfig) -> anyhow::Result<Database> {
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    Ok(db)
}
