use fastcdc::v2020;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid chunker configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chunking failed: {0}")]
    Cdc(String),
}

impl From<v2020::Error> for Error {
    fn from(value: v2020::Error) -> Self {
        match value {
            v2020::Error::IoError(e) => Error::Io(e),
            other => Error::Cdc(format!("{other:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
