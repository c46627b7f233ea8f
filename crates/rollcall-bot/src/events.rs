//! Classify incoming messages into commands, trackable text and videos.

use rollcall_shared::{GroupId, MemberId};

use crate::commands::Command;
use crate::telegram::{Message, User};

/// A member who sent, or is the target of, a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: MemberId,
    pub name: String,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: MemberId(user.id),
            name: user.full_name(),
        }
    }
}

/// Where a message came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub chat: GroupId,
    pub chat_title: String,
    pub message_id: i64,
    pub actor: Actor,
    /// Author of the message this one replies to.
    pub reply_target: Option<Actor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command { origin: Origin, command: Command },
    Text { origin: Origin, text: String },
    Video { origin: Origin, file_id: String },
}

impl Inbound {
    /// `None` for messages the bot never acts on: no sender, no content, or
    /// an unknown command.
    pub fn classify(message: &Message) -> Option<Self> {
        let actor = Actor::from(message.from.as_ref()?);
        let origin = Origin {
            chat: GroupId(message.chat.id),
            chat_title: message.chat.title.clone().unwrap_or_default(),
            message_id: message.message_id,
            actor,
            reply_target: message
                .reply_to_message
                .as_ref()
                .and_then(|m| m.from.as_ref())
                .map(Actor::from),
        };

        if let Some(video) = &message.video {
            return Some(Self::Video {
                origin,
                file_id: video.file_id.clone(),
            });
        }

        if let Some(text) = &message.text {
            if text.starts_with('/') {
                let command = Command::parse(text)?;
                return Some(Self::Command { origin, command });
            }
        }

        let text = [message.text.as_deref(), message.caption.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if text.trim().is_empty() {
            return None;
        }
        Some(Self::Text { origin, text })
    }

    pub fn origin(&self) -> &Origin {
        match self {
            Self::Command { origin, .. }
            | Self::Text { origin, .. }
            | Self::Video { origin, .. } => origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(extra: serde_json::Value) -> Message {
        let mut value = json!({
            "message_id": 5,
            "from": { "id": 42, "first_name": "Ann" },
            "chat": { "id": -100, "title": "Raid" },
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn commands_carry_reply_target() {
        let msg = message(json!({
            "text": "/save",
            "reply_to_message": {
                "message_id": 4,
                "from": { "id": 9, "first_name": "Bo", "last_name": "Ng" },
                "chat": { "id": -100 }
            }
        }));

        match Inbound::classify(&msg).unwrap() {
            Inbound::Command { origin, command } => {
                assert_eq!(command, Command::Save);
                assert_eq!(origin.chat, GroupId(-100));
                assert_eq!(origin.chat_title, "Raid");
                let target = origin.reply_target.unwrap();
                assert_eq!(target.id, MemberId(9));
                assert_eq!(target.name, "Bo Ng");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_commands_are_dropped() {
        assert_eq!(Inbound::classify(&message(json!({ "text": "/start" }))), None);
    }

    #[test]
    fn captions_are_tracked_but_videos_win() {
        let photo = message(json!({ "caption": "https://x.com/a/status/1" }));
        assert!(matches!(
            Inbound::classify(&photo),
            Some(Inbound::Text { ref text, .. }) if text == "https://x.com/a/status/1"
        ));

        let video = message(json!({ "video": { "file_id": "vid" }, "caption": "done" }));
        assert!(matches!(Inbound::classify(&video), Some(Inbound::Video { .. })));
    }

    #[test]
    fn messages_without_sender_or_content_are_dropped() {
        let mut msg = message(json!({ "text": "hello" }));
        msg.from = None;
        assert_eq!(Inbound::classify(&msg), None);
        assert_eq!(Inbound::classify(&message(json!({}))), None);
    }
}
