use rollcall_shared::GroupId;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    pub fn get_tracking_link(&self, chat_id: GroupId) -> Result<Option<String>> {
        let link = self
            .conn()
            .query_row(
                "SELECT tracking_link FROM group_settings WHERE chat_id = ?1",
                params![chat_id.0],
                |row| row.get(0),
            )
            .optional()?;
        Ok(link)
    }

    pub fn set_tracking_link(&self, chat_id: GroupId, link: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO group_settings (chat_id, tracking_link) VALUES (?1, ?2)",
            params![chat_id.0, link],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_link_overwrites() {
        let db = Database::open_in_memory().unwrap();
        let chat = GroupId(-10);

        assert_eq!(db.get_tracking_link(chat).unwrap(), None);
        db.set_tracking_link(chat, "x.com/first").unwrap();
        db.set_tracking_link(chat, "x.com/second").unwrap();
        assert_eq!(db.get_tracking_link(chat).unwrap().as_deref(), Some("x.com/second"));
        assert_eq!(db.get_tracking_link(GroupId(-11)).unwrap(), None);
    }
}
