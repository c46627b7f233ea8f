use std::collections::HashMap;

use rollcall_shared::{GroupId, SessionPhase};
use tracing::debug;

use crate::aliasing::GroupSession;

/// In-memory session phase of each effective group.
///
/// Phases are control state, not compliance data: they are never persisted
/// and a restart puts every group back to [`SessionPhase::Collecting`].
#[derive(Debug, Default)]
pub struct SessionPhases {
    phases: HashMap<GroupId, SessionPhase>,
}

impl SessionPhases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase; groups never opened are collecting.
    pub fn phase(&self, session: &GroupSession<'_>) -> SessionPhase {
        self.phases
            .get(&session.group())
            .copied()
            .unwrap_or_default()
    }

    pub fn open(&mut self, session: &GroupSession<'_>) {
        self.set(session.group(), SessionPhase::Collecting);
    }

    pub fn start_tracking(&mut self, session: &GroupSession<'_>) {
        self.set(session.group(), SessionPhase::Confirming);
    }

    /// Forget the phase of a group; it reads as collecting afterwards.
    pub fn clear(&mut self, session: &GroupSession<'_>) {
        if self.phases.remove(&session.group()).is_some() {
            debug!(group = %session.group(), "session phase cleared");
        }
    }

    fn set(&mut self, group: GroupId, phase: SessionPhase) {
        debug!(group = %group, phase = phase.as_str(), "session phase set");
        self.phases.insert(group, phase);
    }
}
