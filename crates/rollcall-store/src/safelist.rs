use rollcall_shared::{GroupId, MemberId};
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Returns `false` when the member was already safelisted.
    pub fn add_to_safelist(&self, chat_id: GroupId, member_id: MemberId) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO safelist (chat_id, member_id) VALUES (?1, ?2)",
            params![chat_id.0, member_id.0],
        )?;
        Ok(affected > 0)
    }

    pub fn remove_from_safelist(&self, chat_id: GroupId, member_id: MemberId) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM safelist WHERE chat_id = ?1 AND member_id = ?2",
            params![chat_id.0, member_id.0],
        )?;
        Ok(affected > 0)
    }

    /// Safelisted members in the order they were added.
    pub fn list_safelist(&self, chat_id: GroupId) -> Result<Vec<MemberId>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT member_id FROM safelist WHERE chat_id = ?1 ORDER BY rowid ASC")?;

        let rows = stmt.query_map(params![chat_id.0], |row| row.get::<_, i64>(0))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(MemberId(row?));
        }
        Ok(members)
    }
}
