//! Read-only listings: `/list`, `/link`, `/users`, `/multiple_link`, `/unsafe`.

use crate::dispatch::{Bot, Result};
use crate::events::Origin;
use crate::format;
use crate::platform::ChatPlatform;

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn list_users(&self, origin: &Origin) -> Result<()> {
        let participants = self.with_session(origin.chat, |s, _| s.participants())?;
        if participants.is_empty() {
            return self.reply(origin, "• No users have shared links yet.").await;
        }
        self.reply(
            origin,
            &format::participant_list("📋 <b>User List:</b>", &participants, false),
        )
        .await
    }

    /// With a reply: the target's primary link.  Without: everyone's.
    pub(crate) async fn list_links(&self, origin: &Origin) -> Result<()> {
        if let Some(target) = &origin.reply_target {
            let link = self.with_session(origin.chat, |s, _| s.primary_link(target.id))?;
            return self
                .reply(
                    origin,
                    &format::member_link(&target.name, target.id, link.as_ref()),
                )
                .await;
        }

        let participants = self.with_session(origin.chat, |s, _| s.participants())?;
        if participants.is_empty() {
            return self.reply(origin, "• No links found.").await;
        }
        self.reply(
            origin,
            &format::participant_list("📋 <b>User Links:</b>", &participants, true),
        )
        .await
    }

    pub(crate) async fn count_users(&self, origin: &Origin) -> Result<()> {
        let count = self.with_session(origin.chat, |s, _| s.participant_count())?;
        self.reply(origin, &format!("📊 <b>Total unique users:</b> {count}"))
            .await
    }

    pub(crate) async fn list_duplicates_and_fraud(&self, origin: &Origin) -> Result<()> {
        let report = self.with_session(origin.chat, |s, _| s.fraud_report())?;
        self.reply(
            origin,
            &format::fraud_report(&report.multi_link_members, &report.cross_attributed_handles),
        )
        .await
    }

    /// Unsafe members in the order they first posted.
    pub(crate) async fn list_unsafe(&self, origin: &Origin) -> Result<()> {
        let unsafe_participants = self.with_session(origin.chat, |s, _| {
            let unsafe_members = s.unsafe_members()?;
            Ok(s.participants()?
                .into_iter()
                .filter(|p| unsafe_members.contains(&p.member_id))
                .collect::<Vec<_>>())
        })?;

        if unsafe_participants.is_empty() {
            return self.reply(origin, "✅ All users are safe.").await;
        }
        self.reply(
            origin,
            &format::participant_list("⚠️ <b>Unsafe users:</b>", &unsafe_participants, false),
        )
        .await
    }
}
