use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use tracing::{debug, info};

use crate::chunks::{ChunkReader, Key};

use super::{error::Result, hash_list::HashList};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PullSummary {
    pub chunks: usize,
    pub bytes: u64,
}

/// Reconstructs the stream identified by `root` into the file at `output`.
///
/// The file is only created once the hash list has been fetched and parsed.
/// A failure while copying chunks leaves the partially written file behind;
/// its content must not be trusted.
pub fn pull<C>(root: &Key, output: &Path, reader: &C) -> Result<PullSummary>
where
    C: ChunkReader + ?Sized,
{
    let hashes = fetch_hash_list(root, reader)?;
    let mut file = File::create(output)?;
    let summary = copy_chunks(&hashes, &mut file, reader)?;
    file.flush()?;

    info!(
        %root,
        output = %output.display(),
        chunks = summary.chunks,
        bytes = summary.bytes,
        "pulled stream"
    );
    Ok(summary)
}

/// Like [`pull`], but writes the stream to `dest`.
pub fn pull_to_writer<C>(root: &Key, dest: &mut dyn Write, reader: &C) -> Result<PullSummary>
where
    C: ChunkReader + ?Sized,
{
    let hashes = fetch_hash_list(root, reader)?;
    let summary = copy_chunks(&hashes, dest, reader)?;
    dest.flush()?;

    info!(%root, chunks = summary.chunks, bytes = summary.bytes, "pulled stream");
    Ok(summary)
}

fn fetch_hash_list<C>(root: &Key, reader: &C) -> Result<HashList>
where
    C: ChunkReader + ?Sized,
{
    let mut buf = Vec::new();
    reader.copy(&mut buf, root)?;
    let hashes = HashList::parse(&buf)?;
    debug!(%root, chunks = hashes.len(), "fetched hash list");
    Ok(hashes)
}

fn copy_chunks<C>(hashes: &HashList, dest: &mut dyn Write, reader: &C) -> Result<PullSummary>
where
    C: ChunkReader + ?Sized,
{
    let mut dest = Counting {
        inner: dest,
        bytes: 0,
    };
    for key in hashes {
        reader.copy(&mut dest, key)?;
    }
    Ok(PullSummary {
        chunks: hashes.len(),
        bytes: dest.bytes,
    })
}

struct Counting<'a> {
    inner: &'a mut dyn Write,
    bytes: u64,
}

impl Write for Counting<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
