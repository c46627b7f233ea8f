//! Bot configuration loaded from environment variables.
//!
//! Everything except the bot token has a default, so a local run only needs
//! `BOT_TOKEN`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use rollcall_shared::constants::{
    DEFAULT_CONFIRMATION_TTL_SECS, DEFAULT_DEADLINE_MINUTES, DEFAULT_DEADLINE_UTC_OFFSET_MINUTES,
    DEFAULT_DEADLINE_ZONE_LABEL, DEFAULT_HTTP_PORT, DEFAULT_PLATFORM_CALL_TIMEOUT_SECS,
    DEFAULT_PURGE_COUNT, DEFAULT_TRACKING_LINK,
};

/// Bot configuration.
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    /// Env: `BOT_TOKEN`
    pub bot_token: String,

    /// Socket address for the webhook listener.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite file. `None` uses the platform data directory.
    /// Env: `DATABASE_PATH`
    pub database_path: Option<PathBuf>,

    /// Public URL registered with `setWebhook` at startup.
    /// Env: `WEBHOOK_URL`
    /// Default: unset (webhook managed elsewhere).
    pub webhook_url: Option<String>,

    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value.
    /// Env: `WEBHOOK_SECRET`
    pub webhook_secret: Option<String>,

    /// Env: `API_BASE_URL`
    /// Default: `https://api.telegram.org`
    pub api_base_url: String,

    /// Link announced by `/tracking` when a group never ran `/set`.
    /// Env: `DEFAULT_TRACKING_LINK`
    pub default_tracking_link: String,

    /// Animation file id sent on `/open`.
    /// Env: `OPEN_ANIMATION_ID`
    pub open_animation_id: Option<String>,

    /// Env: `DEADLINE_MINUTES`
    /// Default: `60`
    pub deadline_minutes: i64,

    /// Fixed offset deadlines are rendered in.
    /// Env: `DEADLINE_UTC_OFFSET_MINUTES`
    /// Default: `330` (UTC+05:30)
    pub deadline_offset: FixedOffset,

    /// Env: `DEADLINE_ZONE_LABEL`
    /// Default: `IST`
    pub deadline_zone_label: String,

    /// Timeout applied to each restrict call of a mute-all.
    /// Env: `PLATFORM_CALL_TIMEOUT_SECS`
    pub platform_call_timeout: Duration,

    /// How long the `/clean` confirmation stays up.
    /// Env: `CONFIRMATION_TTL_SECS`
    pub confirmation_ttl: Duration,

    /// Env: `PURGE_DEFAULT_COUNT`
    pub purge_default_count: i64,
}

// Keeps the token out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<set>"))
            .field("api_base_url", &self.api_base_url)
            .field("default_tracking_link", &self.default_tracking_link)
            .field("deadline_minutes", &self.deadline_minutes)
            .field("deadline_offset", &self.deadline_offset)
            .field("deadline_zone_label", &self.deadline_zone_label)
            .field("platform_call_timeout", &self.platform_call_timeout)
            .field("confirmation_ttl", &self.confirmation_ttl)
            .field("purge_default_count", &self.purge_default_count)
            .finish_non_exhaustive()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            webhook_url: None,
            webhook_secret: None,
            api_base_url: "https://api.telegram.org".to_string(),
            default_tracking_link: DEFAULT_TRACKING_LINK.to_string(),
            open_animation_id: None,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            deadline_offset: offset_from_minutes(DEFAULT_DEADLINE_UTC_OFFSET_MINUTES)
                .unwrap_or_else(|| Utc.fix()),
            deadline_zone_label: DEFAULT_DEADLINE_ZONE_LABEL.to_string(),
            platform_call_timeout: Duration::from_secs(DEFAULT_PLATFORM_CALL_TIMEOUT_SECS),
            confirmation_ttl: Duration::from_secs(DEFAULT_CONFIRMATION_TTL_SECS),
            purge_default_count: DEFAULT_PURGE_COUNT,
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("BOT_TOKEN") {
            config.bot_token = token.trim().to_string();
        }

        if let Some(addr) = var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        config.database_path = non_empty("DATABASE_PATH").map(PathBuf::from);
        config.webhook_url = non_empty("WEBHOOK_URL");
        config.webhook_secret = non_empty("WEBHOOK_SECRET");
        config.open_animation_id = non_empty("OPEN_ANIMATION_ID");

        if let Some(url) = non_empty("API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(link) = non_empty("DEFAULT_TRACKING_LINK") {
            config.default_tracking_link = link;
        }

        if let Some(val) = var("DEADLINE_MINUTES") {
            match val.parse::<i64>() {
                Ok(n) if n > 0 => config.deadline_minutes = n,
                _ => tracing::warn!(value = %val, "Invalid DEADLINE_MINUTES, using default"),
            }
        }

        if let Some(val) = var("DEADLINE_UTC_OFFSET_MINUTES") {
            match val.parse::<i32>().ok().and_then(offset_from_minutes) {
                Some(offset) => config.deadline_offset = offset,
                None => tracing::warn!(
                    value = %val,
                    "Invalid DEADLINE_UTC_OFFSET_MINUTES, using default"
                ),
            }
        }

        if let Some(label) = non_empty("DEADLINE_ZONE_LABEL") {
            config.deadline_zone_label = label;
        }

        if let Some(val) = var("PLATFORM_CALL_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(n) if n > 0 => config.platform_call_timeout = Duration::from_secs(n),
                _ => tracing::warn!(
                    value = %val,
                    "Invalid PLATFORM_CALL_TIMEOUT_SECS, using default"
                ),
            }
        }

        if let Some(val) = var("CONFIRMATION_TTL_SECS") {
            if let Ok(n) = val.parse::<u64>() {
                config.confirmation_ttl = Duration::from_secs(n);
            }
        }

        if let Some(val) = var("PURGE_DEFAULT_COUNT") {
            match val.parse::<i64>() {
                Ok(n) if n >= 0 => config.purge_default_count = n,
                _ => tracing::warn!(value = %val, "Invalid PURGE_DEFAULT_COUNT, using default"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}
