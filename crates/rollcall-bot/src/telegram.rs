//! Telegram Bot API: the update types the bot reads and a JSON client.

use chrono::{DateTime, Utc};
use rollcall_engine::MemberRestrictor;
use rollcall_shared::{GroupId, MemberId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::error::PlatformError;
use crate::platform::{ChatPlatform, MemberStatus, PlatformResult};

// ---------------------------------------------------------------------------
// Update types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub video: Option<Video>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

pub struct TelegramClient {
    http: reqwest::Client,
    /// `<api base>/bot<token>`
    endpoint: String,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> PlatformResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.platform_call_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/bot{}", config.api_base_url, config.bot_token),
        })
    }

    /// Point Telegram at our webhook.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> PlatformResult<()> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message"],
        });
        if let Some(secret) = secret {
            body["secret_token"] = json!(secret);
        }

        let _: bool = self.call("setWebhook", body).await?;
        info!(url, "Webhook registered");
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> PlatformResult<T> {
        debug!(method, "Bot API call");

        let response = self
            .http
            .post(format!("{}/{}", self.endpoint, method))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let parsed: ApiResponse<T> = response.json().await.map_err(map_transport_error)?;
        decode_response(parsed)
    }

    async fn call_unit(&self, method: &str, body: serde_json::Value) -> PlatformResult<()> {
        let _: bool = self.call(method, body).await?;
        Ok(())
    }
}

fn map_transport_error(e: reqwest::Error) -> PlatformError {
    if e.is_timeout() {
        PlatformError::Timeout
    } else if e.is_decode() {
        PlatformError::Decode(e.to_string())
    } else {
        PlatformError::Http(e)
    }
}

fn decode_response<T>(response: ApiResponse<T>) -> PlatformResult<T> {
    if !response.ok {
        return Err(PlatformError::Api {
            code: response.error_code.unwrap_or_default(),
            description: response.description.unwrap_or_default(),
        });
    }
    response
        .result
        .ok_or_else(|| PlatformError::Decode("missing result".to_string()))
}

/// Permission set applied by `setChatPermissions`.
fn chat_permissions(open: bool) -> serde_json::Value {
    json!({
        "can_send_messages": open,
        "can_send_audios": open,
        "can_send_documents": open,
        "can_send_photos": open,
        "can_send_videos": open,
        "can_send_video_notes": open,
        "can_send_voice_notes": open,
        "can_send_polls": open,
        "can_send_other_messages": open,
        "can_add_web_page_previews": open,
        "can_change_info": false,
        "can_invite_users": open,
        "can_pin_messages": false,
    })
}

impl MemberRestrictor for TelegramClient {
    type Error = PlatformError;

    async fn restrict_member(
        &self,
        chat: GroupId,
        member: MemberId,
        until: Option<DateTime<Utc>>,
    ) -> PlatformResult<()> {
        let mut body = json!({
            "chat_id": chat.0,
            "user_id": member.0,
            "permissions": { "can_send_messages": false },
        });
        if let Some(until) = until {
            body["until_date"] = json!(until.timestamp());
        }
        self.call_unit("restrictChatMember", body).await
    }
}

impl ChatPlatform for TelegramClient {
    async fn member_status(&self, chat: GroupId, member: MemberId) -> PlatformResult<MemberStatus> {
        let member: ChatMember = self
            .call("getChatMember", json!({ "chat_id": chat.0, "user_id": member.0 }))
            .await?;
        MemberStatus::parse(&member.status).ok_or_else(|| {
            PlatformError::Decode(format!("unknown member status {}", member.status))
        })
    }

    async fn send_message(&self, chat: GroupId, text: &str) -> PlatformResult<i64> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                json!({ "chat_id": chat.0, "text": text, "parse_mode": "HTML" }),
            )
            .await?;
        Ok(sent.message_id)
    }

    async fn reply(&self, chat: GroupId, message_id: i64, text: &str) -> PlatformResult<i64> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                json!({
                    "chat_id": chat.0,
                    "text": text,
                    "parse_mode": "HTML",
                    "reply_parameters": {
                        "message_id": message_id,
                        "allow_sending_without_reply": true,
                    },
                }),
            )
            .await?;
        Ok(sent.message_id)
    }

    async fn send_animation(&self, chat: GroupId, file_id: &str) -> PlatformResult<()> {
        let _: SentMessage = self
            .call("sendAnimation", json!({ "chat_id": chat.0, "animation": file_id }))
            .await?;
        Ok(())
    }

    async fn pin_message(&self, chat: GroupId, message_id: i64) -> PlatformResult<()> {
        self.call_unit(
            "pinChatMessage",
            json!({ "chat_id": chat.0, "message_id": message_id }),
        )
        .await
    }

    async fn set_title(&self, chat: GroupId, title: &str) -> PlatformResult<()> {
        self.call_unit("setChatTitle", json!({ "chat_id": chat.0, "title": title }))
            .await
    }

    async fn set_chat_open(&self, chat: GroupId, open: bool) -> PlatformResult<()> {
        self.call_unit(
            "setChatPermissions",
            json!({ "chat_id": chat.0, "permissions": chat_permissions(open) }),
        )
        .await
    }

    async fn delete_message(&self, chat: GroupId, message_id: i64) -> PlatformResult<()> {
        self.call_unit(
            "deleteMessage",
            json!({ "chat_id": chat.0, "message_id": message_id }),
        )
        .await
    }
}
