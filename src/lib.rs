pub mod chunker;
pub mod chunks;
pub mod config;
pub mod serve;
pub mod system;

pub use self::chunker::{Chunker, ChunkerConfig};
pub use self::chunks::{
    CachingReader, ChainedReader, ChunkReader, ChunkStore, ChunkWriter, Key, LocalStore,
    MemoryChunkStore, RemoteReader,
};
pub use self::config::Config;
pub use self::system::{prepare, pull, pull_to_writer, HashList};
