//! Group connections: one chat driving another chat's session data.

use rollcall_shared::GroupId;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Target chat for `chat_id`, if it is connected.
    pub fn get_connection(&self, chat_id: GroupId) -> Result<Option<GroupId>> {
        let target = self
            .conn()
            .query_row(
                "SELECT target_chat_id FROM group_connections WHERE chat_id = ?1",
                params![chat_id.0],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(target.map(GroupId))
    }

    /// Connect `chat_id` to `target`, replacing any previous connection.
    pub fn set_connection(&self, chat_id: GroupId, target: GroupId) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO group_connections (chat_id, target_chat_id) VALUES (?1, ?2)",
            params![chat_id.0, target.0],
        )?;
        Ok(())
    }

    /// Remove the connection for `chat_id`.  Returns `true` if one existed.
    pub fn delete_connection(&self, chat_id: GroupId) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM group_connections WHERE chat_id = ?1",
            params![chat_id.0],
        )?;
        Ok(affected > 0)
    }
}
