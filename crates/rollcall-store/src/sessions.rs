//! Multi-table operations that must see a consistent snapshot.

use chrono::{DateTime, Utc};
use rollcall_shared::{GroupId, MemberId};
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::SessionCleared;

impl Database {
    /// Record a completion proven by media and settle any pending recording.
    ///
    /// Both writes happen in one transaction.  Returns `true` if a pending
    /// recording was cleared.
    pub fn complete_from_media(
        &self,
        chat_id: GroupId,
        member_id: MemberId,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let tx = self.conn().unchecked_transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO completions (chat_id, member_id, completed, last_done)
             VALUES (?1, ?2, 1, ?3)",
            params![chat_id.0, member_id.0, at.to_rfc3339()],
        )?;
        let cleared = tx.execute(
            "DELETE FROM pending_recordings WHERE chat_id = ?1 AND member_id = ?2",
            params![chat_id.0, member_id.0],
        )?;

        tx.commit()?;
        Ok(cleared > 0)
    }

    /// Drop links, completions and pending recordings of a chat.
    ///
    /// The safelist, group settings and group connections are kept.
    pub fn clear_session_data(&self, chat_id: GroupId) -> Result<SessionCleared> {
        let tx = self.conn().unchecked_transaction()?;

        let links = tx.execute("DELETE FROM links WHERE chat_id = ?1", params![chat_id.0])?;
        let completions =
            tx.execute("DELETE FROM completions WHERE chat_id = ?1", params![chat_id.0])?;
        let pending_recordings = tx.execute(
            "DELETE FROM pending_recordings WHERE chat_id = ?1",
            params![chat_id.0],
        )?;

        tx.commit()?;

        tracing::debug!(
            chat = %chat_id,
            links,
            completions,
            pending_recordings,
            "session data cleared"
        );

        Ok(SessionCleared {
            links,
            completions,
            pending_recordings,
        })
    }
}
