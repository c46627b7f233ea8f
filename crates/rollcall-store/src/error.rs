use thiserror::Error;

/// Errors produced by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Any SQLite failure, including unreadable stored timestamps.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Creating the database directory failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
