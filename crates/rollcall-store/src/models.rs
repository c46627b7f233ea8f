//! Domain model structs persisted in the session database.

use chrono::{DateTime, Utc};
use rollcall_shared::{GroupId, MemberId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// One qualifying link posted by a member during the collecting phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    /// Auto-incremented row id; insertion order.
    pub id: i64,
    /// Effective chat the link was recorded under.
    pub chat_id: GroupId,
    pub member_id: MemberId,
    /// Display name of the member at the time of posting.
    pub member_name: String,
    /// Author handle captured from the URL.
    pub handle: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Whether a member confirmed engagement, and when they last did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRecord {
    pub chat_id: GroupId,
    pub member_id: MemberId,
    pub completed: bool,
    pub last_done: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Pending recording
// ---------------------------------------------------------------------------

/// A member who owes a screen recording as proof of engagement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingRecording {
    pub chat_id: GroupId,
    pub member_id: MemberId,
    pub member_name: String,
    pub added_on: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Session close
// ---------------------------------------------------------------------------

/// Row counts removed by a session close.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCleared {
    pub links: usize,
    pub completions: usize,
    pub pending_recordings: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an RFC-3339 column into UTC, reporting failures against `col`.
pub(crate) fn parse_timestamp(col: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}
