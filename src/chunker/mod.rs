mod cdc;
mod error;
mod pol;

pub use cdc::{
    Chunk, Chunker, ChunkerConfig, DEFAULT_AVERAGE_SIZE, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE,
    DEFAULT_POLYNOMIAL,
};
pub use error::{Error, Result};
pub use pol::{ParsePolError, Pol};
