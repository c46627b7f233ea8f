//! # rollcall-engine
//!
//! Session and compliance engine for engagement sessions.
//!
//! Everything that touches per-group state goes through a [`GroupSession`],
//! which can only be obtained by resolving a chat id through its group
//! connection. The engine never talks to the chat platform except through
//! [`MemberRestrictor`] when a mute plan is executed, and it never checks
//! who is asking: authorization belongs to the caller.

pub mod aliasing;
pub mod compliance;
pub mod fraud;
pub mod mute;
pub mod phase;

mod error;

pub use aliasing::GroupSession;
pub use compliance::{Participant, TextOutcome};
pub use error::{EngineError, Result};
pub use fraud::{CrossAttributedHandle, FraudReport, HandleClaim, MultiLinkMember};
pub use mute::{execute_mute, MemberRestrictor, MuteFailure, MutePlan, MuteReport, MuteTarget};
pub use phase::SessionPhases;
