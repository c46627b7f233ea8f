use rollcall_shared::{DurationError, GroupId};
use rollcall_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Connection targets must be group ids; positive ids name people.
    #[error("Target {0} is not a group id")]
    InvalidTarget(GroupId),

    #[error("{0}")]
    InvalidDuration(#[from] DurationError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
