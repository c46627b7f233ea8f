//! Passive tracking of ordinary member messages.

use chrono::Utc;
use rollcall_engine::TextOutcome;
use tracing::debug;

use crate::dispatch::{Bot, Result};
use crate::events::Origin;
use crate::format;
use crate::platform::ChatPlatform;

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn track_text(&self, origin: &Origin, text: &str) -> Result<()> {
        let actor = &origin.actor;
        let outcome = self.with_session(origin.chat, |s, phases| {
            s.track_text(phases.phase(s), actor.id, &actor.name, text, Utc::now())
        })?;

        match outcome {
            TextOutcome::Ignored => Ok(()),
            TextOutcome::LinksRecorded(links) => {
                debug!(
                    chat = %origin.chat,
                    member = %actor.id,
                    count = links.len(),
                    "Links recorded"
                );
                Ok(())
            }
            TextOutcome::Completed { primary_link } => {
                let text = format::done_reply(primary_link.as_ref(), &actor.name, actor.id);
                self.reply(origin, &text).await
            }
        }
    }

    /// A video counts as proof of engagement in any phase.
    pub(crate) async fn track_video(&self, origin: &Origin) -> Result<()> {
        let member = origin.actor.id;
        let (cleared, primary) = self.with_session(origin.chat, |s, _| {
            let cleared = s.mark_complete_from_media(member, Utc::now())?;
            Ok((cleared, s.primary_link(member)?))
        })?;

        self.reply(origin, &format::recording_reply(cleared, primary.as_ref()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use rollcall_shared::MemberId;
    use serde_json::json;

    use crate::dispatch::tests::*;

    #[tokio::test]
    async fn links_then_done_after_tracking() {
        let bot = admin_bot();
        bot.handle_update(text(
            MemberId(2),
            "Bob",
            "look https://x.com/bob/status/9 and https://x.com/bob2/status/3",
        ))
        .await;
        assert!(bot.platform.texts().is_empty());

        // Completion phrases are ignored while links are being collected.
        bot.handle_update(text(MemberId(2), "Bob", "done")).await;
        assert!(bot.platform.texts().is_empty());

        bot.handle_update(text(ADMIN, "Admin", "/tracking")).await;
        bot.handle_update(text(MemberId(2), "Bob", "Done ✅")).await;
        assert_eq!(bot.platform.last_text(), "✅️ 𝕏 :- @bob2");

        bot.handle_update(text(MemberId(5), "Eli", "ad")).await;
        assert!(bot.platform.last_text().ends_with("No link shared"));

        // Links posted after tracking started are not recorded.
        bot.handle_update(text(MemberId(6), "Fin", "https://x.com/fin/status/1")).await;
        let count = bot.with_session(CHAT, |s, _| s.participant_count()).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn caption_links_are_tracked() {
        let bot = admin_bot();
        bot.handle_update(update(
            MemberId(2),
            "Bob",
            json!({ "caption": "https://twitter.com/bob/status/1", "photo": [] }),
        ))
        .await;

        let primary = bot
            .with_session(CHAT, |s, _| s.primary_link(MemberId(2)))
            .unwrap()
            .unwrap();
        assert_eq!(primary.handle, "bob");
    }

    #[tokio::test]
    async fn video_clears_pending_recording() {
        let bot = admin_bot();
        bot.handle_update(reply_command("/sr", MemberId(4), "Dan")).await;

        let video = json!({ "video": { "file_id": "vid-1" } });
        bot.handle_update(update(MemberId(4), "Dan", video.clone())).await;
        assert!(bot.platform.last_text().contains("removed from the SR list"));

        let pending = bot.with_session(CHAT, |s, _| s.pending_recording()).unwrap();
        assert!(pending.is_empty());

        bot.handle_update(update(MemberId(9), "Ivy", video)).await;
        assert_eq!(bot.platform.last_text(), "✅️ Marked as done.");
        let completed = bot.with_session(CHAT, |s, _| s.completed()).unwrap();
        assert!(completed.contains(&MemberId(9)));
    }
}
