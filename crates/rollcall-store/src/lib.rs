//! # rollcall-store
//!
//! Durable record store for engagement sessions, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for every table: group
//! connections, group settings, links, completions, pending recordings and
//! the safelist. Every helper takes the chat id it operates on; resolving a
//! chat to its effective group is the caller's job.

pub mod aliases;
pub mod completions;
pub mod database;
pub mod links;
pub mod migrations;
pub mod models;
pub mod pending;
pub mod safelist;
pub mod sessions;
pub mod settings;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
