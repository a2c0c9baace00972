use std::io::Write;

use tracing::debug;

use super::{
    error::{Error, Result},
    key::Key,
    traits::{ChunkReader, ChunkWriter},
};

/// Write-through cache: every chunk successfully read from `reader` is
/// verified against its key and stored into `writer` before it is handed
/// to the caller.
///
/// A chunk that cannot be cached fails the read.
#[derive(Debug)]
pub struct CachingReader<R, W> {
    reader: R,
    writer: W,
}

impl<R: ChunkReader, W: ChunkWriter> CachingReader<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: ChunkReader, W: ChunkWriter> ChunkReader for CachingReader<R, W> {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        let mut buf = Vec::new();
        self.reader.copy(&mut buf, key)?;

        let actual = Key::of(&buf);
        if actual != *key {
            return Err(Error::Corrupt {
                expected: *key,
                actual,
            });
        }

        self.writer.store(&buf)?;
        debug!(%key, size = buf.len(), "cached chunk");

        dest.write_all(&buf)?;
        Ok(())
    }
}
