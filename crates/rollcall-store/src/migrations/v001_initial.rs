//! v001 -- Initial schema creation.
//!
//! Creates the six session tables. Every row is keyed by the *effective*
//! chat id; aliasing happens before the store is reached.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Group connections (source chat -> effective chat, single hop)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS group_connections (
    chat_id        INTEGER PRIMARY KEY NOT NULL,
    target_chat_id INTEGER NOT NULL
);

-- ----------------------------------------------------------------
-- Group settings
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS group_settings (
    chat_id       INTEGER PRIMARY KEY NOT NULL,
    tracking_link TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Links (append-only; latest row per member is the primary link)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS links (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id     INTEGER NOT NULL,
    member_id   INTEGER NOT NULL,
    member_name TEXT NOT NULL,
    handle      TEXT NOT NULL,
    url         TEXT NOT NULL,
    created_at  TEXT NOT NULL                 -- RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_links_chat_member
    ON links(chat_id, member_id, id);

-- ----------------------------------------------------------------
-- Completions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS completions (
    chat_id   INTEGER NOT NULL,
    member_id INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,     -- boolean 0/1
    last_done TEXT,                           -- RFC-3339

    PRIMARY KEY (chat_id, member_id)
);

-- ----------------------------------------------------------------
-- Pending screen recordings
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS pending_recordings (
    chat_id     INTEGER NOT NULL,
    member_id   INTEGER NOT NULL,
    member_name TEXT NOT NULL,
    added_on    TEXT NOT NULL,                -- RFC-3339

    PRIMARY KEY (chat_id, member_id)
);

-- ----------------------------------------------------------------
-- Safelist (survives session close)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS safelist (
    chat_id   INTEGER NOT NULL,
    member_id INTEGER NOT NULL,

    PRIMARY KEY (chat_id, member_id)
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
