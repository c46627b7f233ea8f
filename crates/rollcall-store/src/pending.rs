//! Members who owe a screen recording.

use chrono::{DateTime, Utc};
use rollcall_shared::{GroupId, MemberId};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{parse_timestamp, PendingRecording};

impl Database {
    /// Add (or re-add) a pending recording.  A repeated add replaces the row.
    pub fn upsert_pending(
        &self,
        chat_id: GroupId,
        member_id: MemberId,
        member_name: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO pending_recordings (chat_id, member_id, member_name, added_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![chat_id.0, member_id.0, member_name, at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn list_pending(&self, chat_id: GroupId) -> Result<Vec<PendingRecording>> {
        let mut stmt = self.conn().prepare(
            "SELECT chat_id, member_id, member_name, added_on
             FROM pending_recordings
             WHERE chat_id = ?1
             ORDER BY added_on ASC, member_id ASC",
        )?;

        let rows = stmt.query_map(params![chat_id.0], |row| {
            let added_str: String = row.get(3)?;
            Ok(PendingRecording {
                chat_id: GroupId(row.get(0)?),
                member_id: MemberId(row.get(1)?),
                member_name: row.get(2)?,
                added_on: parse_timestamp(3, &added_str)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }
}
