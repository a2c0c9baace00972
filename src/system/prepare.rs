use std::io::{Read, Write};

use tracing::{debug, info};

use crate::{
    chunker::{Chunker, ChunkerConfig},
    chunks::{ChunkWriter, Key},
};

use super::{error::Result, hash_list::HashList};

/// Splits `input` into chunks, stores every chunk and then the hash list
/// of the stream, and writes the hash list's key (the root hash) to
/// `output` followed by a newline.
///
/// The first chunking or storage failure aborts the run before any hash list
/// is stored. Chunks stored up to that point stay in the store.
pub fn prepare<R, W>(
    output: &mut dyn Write,
    input: R,
    store: &W,
    config: &ChunkerConfig,
) -> Result<Key>
where
    R: Read,
    W: ChunkWriter + ?Sized,
{
    let mut hashes = HashList::new();
    let mut size: u64 = 0;

    for chunk in Chunker::new(input, config)? {
        let chunk = chunk?;
        let key = store.store(&chunk.data)?;
        debug!(%key, offset = chunk.offset, size = chunk.len(), "chunk");
        size += chunk.len() as u64;
        hashes.push(key);
    }

    let root = store.store(&hashes.to_bytes())?;
    info!(%root, chunks = hashes.len(), bytes = size, "prepared stream");

    writeln!(output, "{root}")?;
    Ok(root)
}
