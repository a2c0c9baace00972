use thiserror::Error;

use super::key::Key;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Chunk not found: {0}")]
    NotFound(Key),

    #[error("Chunk {expected} is corrupt: content hashes to {actual}")]
    Corrupt { expected: Key, actual: Key },

    #[error("Unexpected response from {url}: {status}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
