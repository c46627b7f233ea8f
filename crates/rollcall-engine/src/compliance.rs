//! Compliance bookkeeping and the derived member sets.
//!
//! ```text
//! unsafe       = participants - completed - safelisted
//! mute targets = (unsafe ∪ pending recording) - safelisted
//! ```
//!
//! The engine does not check the session phase. Callers decide whether a
//! link or a completion phrase counts right now.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rollcall_shared::{extract_links, AttributedLink, MemberId, SessionPhase};
use rollcall_store::{LinkRecord, PendingRecording, SessionCleared};
use tracing::{debug, info};

use crate::aliasing::GroupSession;
use crate::error::Result;
use crate::phase::SessionPhases;

/// A member who posted at least one link, with their primary link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub member_id: MemberId,
    /// Name on the primary link.
    pub display_name: String,
    /// Most recently inserted link of the member.
    pub primary_link: LinkRecord,
}

impl GroupSession<'_> {
    // ------------------------------------------------------------------
    // Derived sets
    // ------------------------------------------------------------------

    pub fn all_participants(&self) -> Result<BTreeSet<MemberId>> {
        Ok(self.db.participant_ids(self.group())?.into_iter().collect())
    }

    pub fn completed(&self) -> Result<BTreeSet<MemberId>> {
        Ok(self.db.completed_members(self.group())?.into_iter().collect())
    }

    pub fn safelisted(&self) -> Result<BTreeSet<MemberId>> {
        Ok(self.db.list_safelist(self.group())?.into_iter().collect())
    }

    pub fn pending_recording(&self) -> Result<BTreeSet<MemberId>> {
        Ok(self
            .db
            .list_pending(self.group())?
            .into_iter()
            .map(|p| p.member_id)
            .collect())
    }

    /// Participants that neither confirmed nor are safelisted.
    pub fn unsafe_members(&self) -> Result<BTreeSet<MemberId>> {
        let completed = self.completed()?;
        let safelisted = self.safelisted()?;

        Ok(self
            .all_participants()?
            .into_iter()
            .filter(|m| !completed.contains(m) && !safelisted.contains(m))
            .collect())
    }

    /// Members a mute-all would restrict.
    pub fn mute_targets(&self) -> Result<BTreeSet<MemberId>> {
        let safelisted = self.safelisted()?;
        let mut targets = self.unsafe_members()?;
        targets.extend(self.pending_recording()?);
        targets.retain(|m| !safelisted.contains(m));
        Ok(targets)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// The member's most recently inserted link.
    pub fn primary_link(&self, member: MemberId) -> Result<Option<LinkRecord>> {
        Ok(self.db.latest_link(self.group(), member)?)
    }

    /// Participants ordered by their first link.
    pub fn participants(&self) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        for member_id in self.db.participant_ids(self.group())? {
            if let Some(primary_link) = self.primary_link(member_id)? {
                participants.push(Participant {
                    member_id,
                    display_name: primary_link.member_name.clone(),
                    primary_link,
                });
            }
        }
        Ok(participants)
    }

    pub fn participant_count(&self) -> Result<usize> {
        Ok(self.db.count_participants(self.group())?)
    }

    /// Best known name: primary link first, then the pending-recording entry.
    pub fn display_name(&self, member: MemberId) -> Result<Option<String>> {
        if let Some(link) = self.primary_link(member)? {
            return Ok(Some(link.member_name));
        }

        Ok(self
            .db
            .list_pending(self.group())?
            .into_iter()
            .find(|p| p.member_id == member)
            .map(|p| p.member_name))
    }

    pub fn pending_entries(&self) -> Result<Vec<PendingRecording>> {
        Ok(self.db.list_pending(self.group())?)
    }

    /// Safelisted members in the order they were added.
    pub fn safelist_entries(&self) -> Result<Vec<MemberId>> {
        Ok(self.db.list_safelist(self.group())?)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Append a link for `member`.  Only meaningful while collecting.
    pub fn record_link(
        &self,
        member: MemberId,
        name: &str,
        link: &AttributedLink,
        at: DateTime<Utc>,
    ) -> Result<LinkRecord> {
        let record = self.db.insert_link(self.group(), member, name, link, at)?;
        debug!(
            group = %self.group(),
            member = %member,
            handle = %record.handle,
            "link recorded"
        );
        Ok(record)
    }

    /// Extract and record every qualifying link in `text`, in order.
    pub fn record_links_from_text(
        &self,
        member: MemberId,
        name: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<Vec<LinkRecord>> {
        extract_links(text)
            .iter()
            .map(|link| self.record_link(member, name, link, at))
            .collect()
    }

    /// Mark `member` as completed.  Repeating it only refreshes `last_done`.
    pub fn mark_complete(&self, member: MemberId, at: DateTime<Utc>) -> Result<()> {
        self.db.upsert_completion(self.group(), member, at)?;
        debug!(group = %self.group(), member = %member, "member completed");
        Ok(())
    }

    /// Mark `member` as completed from a media proof and settle any pending
    /// recording.  Returns `true` if a pending recording was cleared.
    pub fn mark_complete_from_media(&self, member: MemberId, at: DateTime<Utc>) -> Result<bool> {
        let cleared = self.db.complete_from_media(self.group(), member, at)?;
        debug!(
            group = %self.group(),
            member = %member,
            cleared_pending = cleared,
            "member completed from media"
        );
        Ok(cleared)
    }

    pub fn add_pending_recording(
        &self,
        member: MemberId,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.db.upsert_pending(self.group(), member, name, at)?;
        info!(group = %self.group(), member = %member, "pending recording added");
        Ok(())
    }

    /// Returns `false` when the member was already safelisted.
    pub fn save(&self, member: MemberId) -> Result<bool> {
        Ok(self.db.add_to_safelist(self.group(), member)?)
    }

    /// Returns `false` when the member was not safelisted.
    pub fn unsave(&self, member: MemberId) -> Result<bool> {
        Ok(self.db.remove_from_safelist(self.group(), member)?)
    }

    /// The group's tracking link, or `default` if none was set.
    pub fn tracking_link(&self, default: &str) -> Result<String> {
        Ok(self
            .db
            .get_tracking_link(self.group())?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn set_tracking_link(&self, link: &str) -> Result<()> {
        self.db.set_tracking_link(self.group(), link)?;
        info!(group = %self.group(), link, "tracking link updated");
        Ok(())
    }

    /// End the session: drop links, completions and pending recordings and
    /// forget the phase.  The safelist and settings survive.
    pub fn close(&self, phases: &mut SessionPhases) -> Result<SessionCleared> {
        let cleared = self.db.clear_session_data(self.group())?;
        phases.clear(self);
        info!(
            group = %self.group(),
            links = cleared.links,
            completions = cleared.completions,
            pending = cleared.pending_recordings,
            "session closed"
        );
        Ok(cleared)
    }

    /// Route a plain message by phase: links while collecting, completion
    /// phrases while confirming.
    pub fn track_text(
        &self,
        phase: SessionPhase,
        member: MemberId,
        name: &str,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<TextOutcome> {
        match phase {
            SessionPhase::Collecting => {
                let recorded = self.record_links_from_text(member, name, text, at)?;
                if recorded.is_empty() {
                    Ok(TextOutcome::Ignored)
                } else {
                    Ok(TextOutcome::LinksRecorded(recorded))
                }
            }
            SessionPhase::Confirming => {
                if rollcall_shared::looks_like_done(text) {
                    self.mark_complete(member, at)?;
                    Ok(TextOutcome::Completed {
                        primary_link: self.primary_link(member)?,
                    })
                } else {
                    Ok(TextOutcome::Ignored)
                }
            }
        }
    }
}

/// What a tracked message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    Ignored,
    LinksRecorded(Vec<LinkRecord>),
    /// The member confirmed; `primary_link` is `None` if they never posted.
    Completed { primary_link: Option<LinkRecord> },
}
