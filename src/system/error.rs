use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Chunk store error: {0}")]
    ChunkStore(#[from] crate::chunks::Error),

    #[error("Chunking error: {0}")]
    Chunking(#[from] crate::chunker::Error),

    #[error("Malformed hash list at line {line}: {reason}")]
    MalformedHashList { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ChunkStore(e) if e.is_not_found())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
