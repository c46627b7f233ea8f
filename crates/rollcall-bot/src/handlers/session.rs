//! `/open`, `/tracking`, `/close` and `/l`.

use chrono::Utc;
use tracing::{info, warn};

use crate::dispatch::{Bot, Result};
use crate::events::Origin;
use crate::format;
use crate::platform::ChatPlatform;

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn open(&self, origin: &Origin) -> Result<()> {
        self.with_session(origin.chat, |session, phases| {
            phases.open(session);
            Ok(())
        })?;

        self.platform.set_chat_open(origin.chat, true).await?;
        self.retitle(origin, format::open_title(&origin.chat_title)).await;

        if let Some(animation) = &self.config.open_animation_id {
            if let Err(e) = self.platform.send_animation(origin.chat, animation).await {
                warn!(chat = %origin.chat, error = %e, "Could not send open animation");
            }
        }

        self.announce_and_pin(origin, format::OPEN_ANNOUNCEMENT).await;
        info!(chat = %origin.chat, "Session opened");
        Ok(())
    }

    pub(crate) async fn start_tracking(&self, origin: &Origin) -> Result<()> {
        let default_link = &self.config.default_tracking_link;
        let tracking_link = self.with_session(origin.chat, |session, phases| {
            phases.start_tracking(session);
            session.tracking_link(default_link)
        })?;

        self.retitle(origin, format::tracking_title(&origin.chat_title)).await;
        self.platform.set_chat_open(origin.chat, true).await?;

        let deadline = format::deadline(
            Utc::now(),
            self.config.deadline_minutes,
            &self.config.deadline_offset,
            &self.config.deadline_zone_label,
        );
        let text = format::tracking_announcement(&tracking_link, &deadline);
        self.announce_and_pin(origin, &text).await;

        info!(chat = %origin.chat, deadline, "Tracking started");
        Ok(())
    }

    pub(crate) async fn close_session(&self, origin: &Origin) -> Result<()> {
        self.with_session(origin.chat, |session, phases| session.close(phases))?;

        self.platform.set_chat_open(origin.chat, false).await?;
        self.retitle(origin, Some(format::closed_title(&origin.chat_title)))
            .await;

        self.reply(
            origin,
            "🗑️ <b>Session closed. All data cleared!</b> 🔒 Chat is now OFF.",
        )
        .await
    }

    pub(crate) async fn lock_chat(&self, origin: &Origin) -> Result<()> {
        self.platform.set_chat_open(origin.chat, false).await?;
        self.reply(origin, "🔒 Chat is now OFF. Wait for TL update.")
            .await
    }

    /// Rename the chat; failures only get logged.
    async fn retitle(&self, origin: &Origin, title: Option<String>) {
        let Some(title) = title else { return };
        if origin.chat_title.is_empty() {
            return;
        }
        if let Err(e) = self.platform.set_title(origin.chat, &title).await {
            warn!(chat = %origin.chat, error = %e, "Could not set chat title");
        }
    }

    /// Post `text` and pin it.  If either step fails, tell the chat why.
    async fn announce_and_pin(&self, origin: &Origin, text: &str) {
        let pinned = match self.platform.send_message(origin.chat, text).await {
            Ok(message_id) => self.platform.pin_message(origin.chat, message_id).await,
            Err(e) => Err(e),
        };

        if let Err(e) = pinned {
            warn!(chat = %origin.chat, error = %e, "Could not pin announcement");
            if let Err(e) = self
                .platform
                .send_message(origin.chat, format::pin_failure(&e))
                .await
            {
                warn!(chat = %origin.chat, error = %e, "Could not send pin hint");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rollcall_shared::{MemberId, SessionPhase};

    use crate::dispatch::tests::*;
    use crate::platform::fake::{Call, FakePlatform};

    fn phase(bot: &crate::dispatch::Bot<crate::platform::fake::FakePlatform>) -> SessionPhase {
        bot.with_session(CHAT, |s, p| Ok(p.phase(s))).unwrap()
    }

    #[tokio::test]
    async fn open_unlocks_retitles_and_pins() {
        let bot = admin_bot();
        bot.handle_update(update_in(
            CHAT,
            "Raid [CLOSED]",
            ADMIN,
            "Admin",
            serde_json::json!({ "text": "/open" }),
        ))
        .await;

        let calls = bot.platform.calls();
        assert!(calls.contains(&Call::Open { chat: CHAT, open: true }));
        assert!(calls.contains(&Call::Title {
            chat: CHAT,
            title: "Raid [OPEN]".into()
        }));
        assert!(calls.iter().any(|c| matches!(c, Call::Pin { .. })));
        assert!(bot.platform.texts()[0].contains("Start dropping your post links"));
        assert_eq!(phase(&bot), SessionPhase::Collecting);
    }

    #[tokio::test]
    async fn pin_failure_mentions_rights() {
        let bot = admin_bot();
        *bot.platform.pin_error.lock().unwrap() =
            Some("Bad Request: not enough rights to manage pinned messages in the chat".into());

        bot.handle_update(text(ADMIN, "Admin", "/open")).await;

        assert_eq!(
            bot.platform.last_text(),
            "⚠️ Could not pin message. Please grant 'Pin Messages' admin rights."
        );
    }

    #[tokio::test]
    async fn tracking_announces_link_and_deadline() {
        let bot = admin_bot();
        bot.handle_update(text(ADMIN, "Admin", "/set x.com/team_tl")).await;
        bot.handle_update(update_in(
            CHAT,
            "Raid [OPEN]",
            ADMIN,
            "Admin",
            serde_json::json!({ "text": "/tracking" }),
        ))
        .await;

        assert_eq!(phase(&bot), SessionPhase::Confirming);
        let announcement = bot.platform.last_text();
        assert!(announcement.contains("x.com/team_tl"));
        assert!(announcement.contains("DEADLINE:"));
        assert!(announcement.ends_with(" IST"));
        assert!(bot.platform.calls().contains(&Call::Title {
            chat: CHAT,
            title: "Raid [CLOSED]".into()
        }));
    }

    #[tokio::test]
    async fn tracking_uses_default_link() {
        let bot = admin_bot();
        bot.handle_update(text(ADMIN, "Admin", "/tracking")).await;
        assert!(bot.platform.last_text().contains("x.com/your_default_username"));
    }

    #[tokio::test]
    async fn close_clears_session_but_keeps_safelist() {
        let bot = admin_bot();
        bot.handle_update(reply_command("/save", MemberId(9), "Sam")).await;
        bot.handle_update(text(MemberId(5), "Ann", "https://x.com/ann/status/1")).await;
        bot.handle_update(text(ADMIN, "Admin", "/tracking")).await;

        bot.handle_update(update_in(
            CHAT,
            "Raid [OPEN]",
            ADMIN,
            "Admin",
            serde_json::json!({ "text": "/close" }),
        ))
        .await;

        assert_eq!(phase(&bot), SessionPhase::Collecting);
        let (participants, safelisted) = bot
            .with_session(CHAT, |s, _| Ok((s.participant_count()?, s.safelisted()?)))
            .unwrap();
        assert_eq!(participants, 0);
        assert!(safelisted.contains(&MemberId(9)));

        let calls = bot.platform.calls();
        assert!(calls.contains(&Call::Open { chat: CHAT, open: false }));
        assert!(calls.contains(&Call::Title {
            chat: CHAT,
            title: "Raid [CLOSED]".into()
        }));
        assert!(bot.platform.last_text().contains("Session closed"));
    }

    #[tokio::test]
    async fn lock_closes_chat_only() {
        let bot = admin_bot();
        bot.handle_update(text(ADMIN, "Admin", "/l")).await;

        assert!(bot.platform.calls().contains(&Call::Open { chat: CHAT, open: false }));
        assert_eq!(bot.platform.last_text(), "🔒 Chat is now OFF. Wait for TL update.");
    }

    #[tokio::test]
    async fn missing_permission_rights_get_a_hint() {
        let bot = bot_with(FakePlatform {
            permissions_error: Some(
                "Bad Request: not enough rights to change chat permissions".into(),
            ),
            ..FakePlatform::with_admin(ADMIN)
        });

        bot.handle_update(text(ADMIN, "Admin", "/l")).await;

        assert_eq!(
            bot.platform.last_text(),
            "⚠️ I need admin rights (restrict members / change group info) to do that."
        );
    }
}
