//! Reply texts.  Everything here renders Telegram HTML and escapes whatever
//! came from users.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use rollcall_engine::{CrossAttributedHandle, MultiLinkMember, MuteReport, Participant};
use rollcall_shared::constants::{TITLE_CLOSED_MARKER, TITLE_OPEN_MARKER};
use rollcall_shared::MemberId;
use rollcall_store::LinkRecord;

use crate::error::PlatformError;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Clickable mention of a member.
pub fn mention(name: &str, member: MemberId) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", member.0, escape_html(name))
}

fn handle_link(link: &LinkRecord) -> String {
    format!(
        "<a href=\"{}\">@{}</a>",
        escape_html(&link.url),
        escape_html(&link.handle)
    )
}

// ---------------------------------------------------------------------------
// Chat titles
// ---------------------------------------------------------------------------

/// Title after `/open`, or `None` if it already carries the open marker.
pub fn open_title(title: &str) -> Option<String> {
    if title.contains(TITLE_OPEN_MARKER) {
        return None;
    }
    Some(format!(
        "{} {TITLE_OPEN_MARKER}",
        title.replace(TITLE_CLOSED_MARKER, "").trim()
    ))
}

/// Title after `/tracking`, or `None` if it is already marked closed.
pub fn tracking_title(title: &str) -> Option<String> {
    if title.contains(TITLE_OPEN_MARKER) {
        Some(title.replace(TITLE_OPEN_MARKER, TITLE_CLOSED_MARKER))
    } else if title.contains(TITLE_CLOSED_MARKER) {
        None
    } else {
        Some(format!("{} {TITLE_CLOSED_MARKER}", title.trim()))
    }
}

/// Title after `/close`: markers stripped, one closed marker appended.
pub fn closed_title(title: &str) -> String {
    let bare = title
        .replace(TITLE_OPEN_MARKER, "")
        .replace(TITLE_CLOSED_MARKER, "");
    format!("{} {TITLE_CLOSED_MARKER}", bare.trim())
}

// ---------------------------------------------------------------------------
// Session announcements
// ---------------------------------------------------------------------------

pub const OPEN_ANNOUNCEMENT: &str = "<b>🚀 Start dropping your post links!</b>";

/// `now + minutes`, rendered like `07:45 PM IST`.
pub fn deadline(now: DateTime<Utc>, minutes: i64, offset: &FixedOffset, label: &str) -> String {
    let at = Duration::try_minutes(minutes)
        .and_then(|span| now.checked_add_signed(span))
        .unwrap_or(now);
    format!("{} {}", at.with_timezone(offset).format("%I:%M %p"), label)
}

pub fn tracking_announcement(tracking_link: &str, deadline: &str) -> String {
    format!(
        "Timeline Updated 👇\n\n\
         {}\n\n\
         Like all posts of the TL account and\n\
         Drop 'done' (or 'ad', 'completed') to be marked safe ✅\n\n\
         ⚠️ DEADLINE: {}",
        escape_html(tracking_link),
        escape_html(deadline)
    )
}

pub fn pin_failure(error: &PlatformError) -> &'static str {
    if error.is_missing_rights() {
        "⚠️ Could not pin message. Please grant 'Pin Messages' admin rights."
    } else {
        "⚠️ An error occurred while pinning the message."
    }
}

// ---------------------------------------------------------------------------
// Trackers
// ---------------------------------------------------------------------------

pub fn done_reply(primary_link: Option<&LinkRecord>, name: &str, member: MemberId) -> String {
    match primary_link {
        Some(link) => format!("✅️ 𝕏 :- @{}", escape_html(&link.handle)),
        None => format!("⚠️ {} No link shared", mention(name, member)),
    }
}

pub fn recording_reply(cleared_pending: bool, primary_link: Option<&LinkRecord>) -> String {
    if cleared_pending {
        return "✅ Screen recording received. You are marked as 'done' and removed from the SR list."
            .to_string();
    }
    match primary_link {
        Some(link) => format!("✅️ 𝕏 :- @{}", escape_html(&link.handle)),
        None => "✅️ Marked as done.".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Numbered `🙍🏻‍♂️ mention → 𝕏 @handle` lines.
pub fn participant_list(header: &str, participants: &[Participant], linked: bool) -> String {
    let mut msg = format!("{header}\n\n");
    for (idx, p) in participants.iter().enumerate() {
        let handle = if linked {
            handle_link(&p.primary_link)
        } else {
            format!("@{}", escape_html(&p.primary_link.handle))
        };
        let _ = writeln!(
            msg,
            "{}. 🙍🏻‍♂️ {} → 𝕏 {}",
            idx + 1,
            mention(&p.display_name, p.member_id),
            handle
        );
    }
    msg
}

pub fn member_link(name: &str, member: MemberId, link: Option<&LinkRecord>) -> String {
    match link {
        Some(link) => format!("🔗 Link for {}:\n{}", mention(name, member), handle_link(link)),
        None => format!("⚠️ No link found for {}.", mention(name, member)),
    }
}

/// Numbered mentions, one per line.
pub fn member_list(header: &str, members: &[(MemberId, String)]) -> String {
    let mut msg = format!("{header}\n\n");
    for (idx, (member, name)) in members.iter().enumerate() {
        let _ = writeln!(msg, "{}. 🙍🏻‍♂️ {}", idx + 1, mention(name, *member));
    }
    msg
}

pub fn fraud_report(multi: &[MultiLinkMember], cross: &[CrossAttributedHandle]) -> String {
    let mut msg = String::from("🔗 <b>Multiple Links by Same User</b>:\n\n");
    for (idx, member) in multi.iter().enumerate() {
        let _ = writeln!(
            msg,
            "{}. 🙍🏻‍♂️ {}",
            idx + 1,
            mention(&member.display_name, member.member_id)
        );
        for (n, link) in member.links.iter().enumerate() {
            let _ = writeln!(msg, "    {}. 𝕏 {}", n + 1, handle_link(link));
        }
        msg.push('\n');
    }
    if multi.is_empty() {
        msg.push_str("✅ No user shared multiple links.\n\n");
    }

    msg.push_str("🚨 <b>Fraud (Same X Username by Different Users)</b>:\n\n");
    for (idx, handle) in cross.iter().enumerate() {
        let _ = writeln!(msg, "{}. 𝕏 @{}", idx + 1, escape_html(&handle.handle));
        for (n, claim) in handle.claims.iter().enumerate() {
            let _ = writeln!(
                msg,
                "    {}. 🙍🏻‍♂️ {} → <a href=\"{}\">Link</a>",
                n + 1,
                mention(&claim.display_name, claim.member_id),
                escape_html(&claim.url)
            );
        }
        msg.push('\n');
    }
    if cross.is_empty() {
        msg.push_str("✅ No fraud cases found.");
    }
    msg
}

pub fn mute_report(report: &MuteReport) -> String {
    let muted: Vec<String> = report
        .muted
        .iter()
        .map(|t| format!("🙍🏻‍♂️ {}", mention(&t.display_name, t.member_id)))
        .collect();

    let mut msg = format!(
        "🔇 <b>Muted users (unsafe + SR list):</b>\n\n{}",
        muted.join("\n")
    );
    if let Some(label) = &report.duration_label {
        let _ = write!(msg, "\n\n⏱ <b>Duration:</b> {}", escape_html(label));
    }
    if !report.failed.is_empty() {
        msg.push_str("\n\n❌ <b>Failed to mute:</b>");
        for failure in &report.failed {
            let _ = write!(
                msg,
                "\n- {} ({})",
                mention(&failure.target.display_name, failure.target.member_id),
                escape_html(&failure.reason)
            );
        }
    }
    msg
}
