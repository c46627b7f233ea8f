use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Duration is empty")]
    Empty,

    #[error("Invalid duration format: {0:?} (use 1d, 2h, 30m etc.)")]
    Malformed(String),

    #[error("Duration out of range: {0:?}")]
    OutOfRange(String),
}
