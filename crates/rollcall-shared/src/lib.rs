//! # rollcall-shared
//!
//! Identifier types, constants and the pure text scanners shared by the
//! store, the engine and the bot.

pub mod constants;
pub mod duration;
pub mod error;
pub mod links;
pub mod types;

pub use duration::parse_mute_duration;
pub use error::DurationError;
pub use links::{extract_links, looks_like_done};
pub use types::{AttributedLink, GroupId, MemberId, SessionPhase};
