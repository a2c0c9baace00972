mod caching;
mod chained;
mod error;
mod key;
mod local;
mod memory;
mod remote;
mod traits;

pub use caching::CachingReader;
pub use chained::{ChainedReader, HitSummary};
pub use error::{Error, Result};
pub use key::{Key, ParseKeyError};
pub use local::{LocalStore, StoreStats};
pub use memory::MemoryChunkStore;
pub use remote::RemoteReader;
pub use traits::{ChunkReader, ChunkStore, ChunkWriter};
