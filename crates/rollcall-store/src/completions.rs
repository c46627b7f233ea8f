use chrono::{DateTime, Utc};
use rollcall_shared::{GroupId, MemberId};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::{parse_timestamp, CompletionRecord};

impl Database {
    /// Mark `member_id` as completed at `at`.  Overwrites any earlier state.
    pub fn upsert_completion(
        &self,
        chat_id: GroupId,
        member_id: MemberId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO completions (chat_id, member_id, completed, last_done)
             VALUES (?1, ?2, 1, ?3)",
            params![chat_id.0, member_id.0, at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get_completion(
        &self,
        chat_id: GroupId,
        member_id: MemberId,
    ) -> Result<Option<CompletionRecord>> {
        let record = self
            .conn()
            .query_row(
                "SELECT chat_id, member_id, completed, last_done
                 FROM completions WHERE chat_id = ?1 AND member_id = ?2",
                params![chat_id.0, member_id.0],
                |row| {
                    let completed: i64 = row.get(2)?;
                    let last_done: Option<String> = row.get(3)?;
                    Ok(CompletionRecord {
                        chat_id: GroupId(row.get(0)?),
                        member_id: MemberId(row.get(1)?),
                        completed: completed != 0,
                        last_done: last_done.map(|s| parse_timestamp(3, &s)).transpose()?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    pub fn completed_members(&self, chat_id: GroupId) -> Result<Vec<MemberId>> {
        let mut stmt = self.conn().prepare(
            "SELECT member_id FROM completions
             WHERE chat_id = ?1 AND completed = 1
             ORDER BY member_id ASC",
        )?;

        let rows = stmt.query_map(params![chat_id.0], |row| row.get::<_, i64>(0))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(MemberId(row?));
        }
        Ok(members)
    }
}
