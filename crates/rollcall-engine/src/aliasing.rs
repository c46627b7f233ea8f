//! Group connections and effective-group resolution.
//!
//! A chat can be connected to another chat so that its session runs on the
//! other chat's data. Resolution is a single hop: if A -> B and B -> C, A
//! resolves to B.

use rollcall_shared::GroupId;
use rollcall_store::Database;
use tracing::info;

use crate::error::{EngineError, Result};

/// Per-group state scoped to an effective group.
///
/// Only [`GroupSession::resolve`] creates one, so every read and write below
/// is keyed by the resolved id and never by the raw chat id.
#[derive(Clone, Copy)]
pub struct GroupSession<'db> {
    pub(crate) db: &'db Database,
    group: GroupId,
}

impl<'db> GroupSession<'db> {
    /// Resolve `chat` through its connection, if any.
    pub fn resolve(db: &'db Database, chat: GroupId) -> Result<Self> {
        let group = effective_group(db, chat)?;
        Ok(Self { db, group })
    }

    /// The effective group id all state is keyed by.
    pub fn group(&self) -> GroupId {
        self.group
    }
}

/// Effective group of `chat`: its connection target, or itself.
pub fn effective_group(db: &Database, chat: GroupId) -> Result<GroupId> {
    Ok(db.get_connection(chat)?.unwrap_or(chat))
}

/// Point `source` at `target`'s data, replacing any previous connection.
pub fn connect(db: &Database, source: GroupId, target: GroupId) -> Result<()> {
    if !target.looks_like_group() {
        return Err(EngineError::InvalidTarget(target));
    }

    db.set_connection(source, target)?;
    info!(source = %source, target = %target, "group connected");
    Ok(())
}

/// Drop the connection of `source`.  Returns `true` if one existed.
pub fn disconnect(db: &Database, source: GroupId) -> Result<bool> {
    let removed = db.delete_connection(source)?;
    if removed {
        info!(source = %source, "group disconnected");
    }
    Ok(removed)
}

/// The group `source` is connected to, if any.
pub fn connection_status(db: &Database, source: GroupId) -> Result<Option<GroupId>> {
    Ok(db.get_connection(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rollcall_shared::{AttributedLink, MemberId};

    const A: GroupId = GroupId(-100);
    const B: GroupId = GroupId(-200);
    const C: GroupId = GroupId(-300);

    fn link() -> AttributedLink {
        AttributedLink {
            handle: "alice".into(),
            url: "https://x.com/alice/status/1".into(),
        }
    }

    #[test]
    fn unconnected_group_is_its_own_effective_group() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(GroupSession::resolve(&db, A).unwrap().group(), A);
    }

    #[test]
    fn resolution_is_single_hop() {
        let db = Database::open_in_memory().unwrap();
        connect(&db, A, B).unwrap();
        connect(&db, B, C).unwrap();

        assert_eq!(GroupSession::resolve(&db, A).unwrap().group(), B);
        assert_eq!(GroupSession::resolve(&db, B).unwrap().group(), C);
    }

    #[test]
    fn rejects_person_ids_as_targets() {
        let db = Database::open_in_memory().unwrap();
        let err = connect(&db, A, GroupId(12345)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget(GroupId(12345))));
        assert_eq!(connection_status(&db, A).unwrap(), None);
    }

    #[test]
    fn writes_follow_the_connection() {
        let db = Database::open_in_memory().unwrap();
        connect(&db, A, B).unwrap();

        let session = GroupSession::resolve(&db, A).unwrap();
        session.record_link(MemberId(1), "Ann", &link(), Utc::now()).unwrap();

        let under_b = GroupSession::resolve(&db, B).unwrap();
        assert!(under_b.all_participants().unwrap().contains(&MemberId(1)));
        assert!(db.list_links(A).unwrap().is_empty());

        // After disconnecting, A is back on its own (empty) data.
        assert!(disconnect(&db, A).unwrap());
        assert!(!disconnect(&db, A).unwrap());
        let own = GroupSession::resolve(&db, A).unwrap();
        assert_eq!(own.group(), A);
        assert!(own.all_participants().unwrap().is_empty());
    }

    #[test]
    fn connect_overwrites_previous_target() {
        let db = Database::open_in_memory().unwrap();
        connect(&db, A, B).unwrap();
        connect(&db, A, C).unwrap();
        assert_eq!(connection_status(&db, A).unwrap(), Some(C));
    }
}
