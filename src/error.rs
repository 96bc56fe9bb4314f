use thiserror::Error;

pub type BetResult<T> = Result<T, BetError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] redb::Error),
}

#[derive(Debug, Error)]
pub enum BetError {
    #[error("Bet not found: {0}")]
    NotFound(String),

    #[error("Option {option_id} does not exist on bet {bet_id}")]
    UnknownOption { bet_id: String, option_id: String },

    #[error("Cannot double down on bet {0} without voting first")]
    NotVoted(String),

    #[error("Already doubled down on bet {0}")]
    AlreadyDoubledDown(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for BetError {
    fn from(err: serde_json::Error) -> Self {
        BetError::Storage(StorageError::Json(err))
    }
}
