//! Append-only link records.

use chrono::{DateTime, Utc};
use rollcall_shared::{AttributedLink, GroupId, MemberId};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{parse_timestamp, LinkRecord};

const LINK_COLUMNS: &str = "id, chat_id, member_id, member_name, handle, url, created_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Append a link for `member_id`.  Never replaces an earlier row.
    pub fn insert_link(
        &self,
        chat_id: GroupId,
        member_id: MemberId,
        member_name: &str,
        link: &AttributedLink,
        at: DateTime<Utc>,
    ) -> Result<LinkRecord> {
        self.conn().execute(
            "INSERT INTO links (chat_id, member_id, member_name, handle, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                chat_id.0,
                member_id.0,
                member_name,
                link.handle,
                link.url,
                at.to_rfc3339(),
            ],
        )?;

        Ok(LinkRecord {
            id: self.conn().last_insert_rowid(),
            chat_id,
            member_id,
            member_name: member_name.to_string(),
            handle: link.handle.clone(),
            url: link.url.clone(),
            created_at: at,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All links of a chat in insertion order.
    pub fn list_links(&self, chat_id: GroupId) -> Result<Vec<LinkRecord>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE chat_id = ?1 ORDER BY id ASC"
        ))?;

        let rows = stmt.query_map(params![chat_id.0], row_to_link)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// The most recently inserted link of a member (their primary link).
    pub fn latest_link(&self, chat_id: GroupId, member_id: MemberId) -> Result<Option<LinkRecord>> {
        let link = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {LINK_COLUMNS} FROM links
                     WHERE chat_id = ?1 AND member_id = ?2
                     ORDER BY id DESC LIMIT 1"
                ),
                params![chat_id.0, member_id.0],
                row_to_link,
            )
            .optional()?;
        Ok(link)
    }

    /// Distinct members with at least one link, ordered by their first link.
    pub fn participant_ids(&self, chat_id: GroupId) -> Result<Vec<MemberId>> {
        let mut stmt = self.conn().prepare(
            "SELECT member_id FROM links
             WHERE chat_id = ?1
             GROUP BY member_id
             ORDER BY MIN(id) ASC",
        )?;

        let rows = stmt.query_map(params![chat_id.0], |row| row.get::<_, i64>(0))?;

        let mut members = Vec::new();
        for row in rows {
            members.push(MemberId(row?));
        }
        Ok(members)
    }

    pub fn count_participants(&self, chat_id: GroupId) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(DISTINCT member_id) FROM links WHERE chat_id = ?1",
            params![chat_id.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_to_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<LinkRecord> {
    let created_str: String = row.get(6)?;

    Ok(LinkRecord {
        id: row.get(0)?,
        chat_id: GroupId(row.get(1)?),
        member_id: MemberId(row.get(2)?),
        member_name: row.get(3)?,
        handle: row.get(4)?,
        url: row.get(5)?,
        created_at: parse_timestamp(6, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(handle: &str, n: u32) -> AttributedLink {
        AttributedLink {
            handle: handle.to_string(),
            url: format!("https://x.com/{handle}/status/{n}"),
        }
    }

    #[test]
    fn latest_link_is_last_inserted() {
        let db = Database::open_in_memory().unwrap();
        let chat = GroupId(-1);
        let now = Utc::now();

        db.insert_link(chat, MemberId(7), "Ann", &link("first", 1), now).unwrap();
        let second = db.insert_link(chat, MemberId(7), "Ann B", &link("second", 2), now).unwrap();

        let latest = db.latest_link(chat, MemberId(7)).unwrap().unwrap();
        assert_eq!(latest, second);
        assert_eq!(latest.member_name, "Ann B");
        assert!(db.latest_link(chat, MemberId(8)).unwrap().is_none());
    }

    #[test]
    fn participants_are_distinct_and_ordered_by_first_link() {
        let db = Database::open_in_memory().unwrap();
        let chat = GroupId(-1);
        let now = Utc::now();

        db.insert_link(chat, MemberId(30), "C", &link("c", 1), now).unwrap();
        db.insert_link(chat, MemberId(10), "A", &link("a", 2), now).unwrap();
        db.insert_link(chat, MemberId(30), "C", &link("c", 3), now).unwrap();
        db.insert_link(GroupId(-2), MemberId(99), "Z", &link("z", 4), now).unwrap();

        assert_eq!(db.participant_ids(chat).unwrap(), vec![MemberId(30), MemberId(10)]);
        assert_eq!(db.count_participants(chat).unwrap(), 2);
        assert_eq!(db.list_links(chat).unwrap().len(), 3);
    }

    #[test]
    fn session_clear_is_scoped_to_chat() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();

        db.insert_link(GroupId(-1), MemberId(1), "A", &link("a", 1), now).unwrap();
        db.insert_link(GroupId(-2), MemberId(1), "A", &link("a", 2), now).unwrap();

        assert_eq!(db.clear_session_data(GroupId(-1)).unwrap().links, 1);
        assert!(db.list_links(GroupId(-1)).unwrap().is_empty());
        assert_eq!(db.list_links(GroupId(-2)).unwrap().len(), 1);
    }
}
