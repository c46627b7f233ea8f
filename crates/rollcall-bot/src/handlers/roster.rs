//! Per-member bookkeeping commands: safelist, manual completion, pending
//! recordings, the tracking link and mute-all.

use chrono::Utc;
use rollcall_engine::execute_mute;

use crate::dispatch::{Bot, Result};
use crate::error::BotError;
use crate::events::{Actor, Origin};
use crate::format::{self, escape_html, mention};
use crate::platform::ChatPlatform;

fn reply_target<'a>(origin: &'a Origin, usage: &str) -> Result<&'a Actor> {
    origin
        .reply_target
        .as_ref()
        .ok_or_else(|| BotError::Input(usage.to_string()))
}

impl<P: ChatPlatform> Bot<P> {
    pub(crate) async fn save(&self, origin: &Origin) -> Result<()> {
        let target = reply_target(
            origin,
            "Reply to a user's message to add them to the safelist.",
        )?;
        self.with_session(origin.chat, |s, _| s.save(target.id))?;

        self.reply(
            origin,
            &format!(
                "✅ {} has been added to the safelist.",
                mention(&target.name, target.id)
            ),
        )
        .await
    }

    pub(crate) async fn unsave(&self, origin: &Origin) -> Result<()> {
        let target = reply_target(
            origin,
            "Reply to a user's message to remove them from the safelist.",
        )?;
        self.with_session(origin.chat, |s, _| s.unsave(target.id))?;

        self.reply(
            origin,
            &format!(
                "🗑️ {} has been removed from the safelist.",
                mention(&target.name, target.id)
            ),
        )
        .await
    }

    pub(crate) async fn list_saved(&self, origin: &Origin) -> Result<()> {
        let members = self.with_session(origin.chat, |s, _| {
            let mut members = Vec::new();
            for member in s.safelist_entries()? {
                let name = s
                    .display_name(member)?
                    .unwrap_or_else(|| format!("ID: {member}"));
                members.push((member, name));
            }
            Ok(members)
        })?;

        if members.is_empty() {
            return self.reply(origin, "📝 The safelist is empty.").await;
        }
        self.reply(
            origin,
            &format::member_list("📝 <b>Safelisted Users:</b>", &members),
        )
        .await
    }

    pub(crate) async fn set_tracking_link(
        &self,
        origin: &Origin,
        link: Option<&str>,
    ) -> Result<()> {
        let link = link.ok_or_else(|| {
            BotError::Input(
                "<b>Usage:</b> <code>/set &lt;link&gt;</code>\n<b>Example:</b> <code>/set x.com/your_user</code>"
                    .into(),
            )
        })?;
        self.with_session(origin.chat, |s, _| s.set_tracking_link(link))?;

        self.reply(
            origin,
            &format!("✅ Tracking link set to: <code>{}</code>", escape_html(link)),
        )
        .await
    }

    pub(crate) async fn mark_done(&self, origin: &Origin) -> Result<()> {
        let target = reply_target(
            origin,
            "Please use this command by replying to a user's message.",
        )?;
        let primary = self.with_session(origin.chat, |s, _| {
            s.mark_complete(target.id, Utc::now())?;
            s.primary_link(target.id)
        })?;

        let mut text = format!(
            "✅️ Manually marked {} as done.",
            mention(&target.name, target.id)
        );
        if let Some(link) = primary {
            text.push_str(&format!("\n𝕏 :- @{}", escape_html(&link.handle)));
        }
        self.reply(origin, &text).await
    }

    pub(crate) async fn add_pending_recording(&self, origin: &Origin) -> Result<()> {
        let target = reply_target(origin, "Reply to a user's message to add them to the SR list.")?;
        self.with_session(origin.chat, |s, _| {
            s.add_pending_recording(target.id, &target.name, Utc::now())
        })?;

        self.reply(
            origin,
            &format!(
                "⚠️ {} your likes are not visible.\nSend a screen recording with a visible profile.",
                mention(&target.name, target.id)
            ),
        )
        .await
    }

    pub(crate) async fn list_pending_recordings(&self, origin: &Origin) -> Result<()> {
        let entries = self.with_session(origin.chat, |s, _| s.pending_entries())?;
        if entries.is_empty() {
            return self.reply(origin, "✅ SR list is empty.").await;
        }

        let members: Vec<_> = entries
            .into_iter()
            .map(|e| (e.member_id, e.member_name))
            .collect();
        self.reply(
            origin,
            &format::member_list("📹 <b>SR List (pending recordings):</b>", &members),
        )
        .await
    }

    pub(crate) async fn mute_all(&self, origin: &Origin, duration: Option<&str>) -> Result<()> {
        let plan = self.with_session(origin.chat, |s, _| s.plan_mute(duration, Utc::now()))?;
        if plan.targets.is_empty() {
            return self.reply(origin, "✅ No users to mute.").await;
        }

        let report = execute_mute(
            self.platform.as_ref(),
            origin.chat,
            &plan,
            self.config.platform_call_timeout,
        )
        .await;

        self.reply(origin, &format::mute_report(&report)).await
    }
}
