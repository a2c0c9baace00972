use std::{
    fs::{self, File},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use super::{
    error::{Error, Result},
    key::Key,
    traits::{ChunkReader, ChunkWriter},
};

/// Counters of what a store did with the chunks handed to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Chunks that were actually written.
    pub writes: u64,
    /// Chunks that were already present and skipped.
    pub deduplicated: u64,
}

/// Filesystem store keeping one file per chunk, named by its key, directly
/// under `root`.
///
/// Chunks are written to a temporary file in `root` and renamed into place,
/// so a key is either absent or fully readable.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
    writes: AtomicU64,
    deduplicated: AtomicU64,
}

impl LocalStore {
    /// Opens the store at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            writes: AtomicU64::new(0),
            deduplicated: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, key: &Key) -> Result<bool> {
        match fs::metadata(self.chunk_path(key)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            writes: self.writes.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
        }
    }

    fn chunk_path(&self, key: &Key) -> PathBuf {
        self.root.join(key.to_string())
    }
}

impl ChunkWriter for LocalStore {
    fn store(&self, data: &[u8]) -> Result<Key> {
        let key = Key::of(data);
        if self.contains(&key)? {
            self.deduplicated.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "chunk already stored");
            return Ok(key);
        }

        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.chunk_path(&key)).map_err(|e| e.error)?;

        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!(%key, size = data.len(), "stored chunk");
        Ok(key)
    }
}

impl ChunkReader for LocalStore {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        let mut file = match File::open(self.chunk_path(key)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotFound(*key)),
            Err(e) => return Err(e.into()),
        };
        let size = io::copy(&mut file, dest)?;
        debug!(%key, size, "read chunk from disk");
        Ok(())
    }
}
