//! Command handlers and passive trackers, split by concern.  Each file adds
//! methods to [`Bot`](crate::dispatch::Bot).

mod groups;
mod purge;
mod reports;
mod roster;
mod session;
mod trackers;
