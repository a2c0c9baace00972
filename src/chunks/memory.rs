use std::{
    collections::HashMap,
    io::Write,
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
};

use bytes::Bytes;

use super::{
    error::{Error, Result},
    key::Key,
    local::StoreStats,
    traits::{ChunkReader, ChunkWriter},
};

/// Chunk store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<HashMap<Key, Bytes>>,
    writes: AtomicU64,
    deduplicated: AtomicU64,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.read_chunks().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read_chunks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            writes: self.writes.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
        }
    }

    /// Places `data` under `key` without checking that it hashes to `key`.
    /// Only useful to simulate a store holding corrupt content.
    pub fn insert_unchecked(&self, key: Key, data: impl Into<Bytes>) {
        self.write_chunks().insert(key, data.into());
    }

    fn read_chunks(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Key, Bytes>> {
        self.chunks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_chunks(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Key, Bytes>> {
        self.chunks.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChunkWriter for MemoryChunkStore {
    fn store(&self, data: &[u8]) -> Result<Key> {
        let key = Key::of(data);
        let mut chunks = self.write_chunks();
        if chunks.contains_key(&key) {
            self.deduplicated.fetch_add(1, Ordering::Relaxed);
        } else {
            chunks.insert(key, Bytes::copy_from_slice(data));
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(key)
    }
}

impl ChunkReader for MemoryChunkStore {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        let chunk = self
            .read_chunks()
            .get(key)
            .cloned()
            .ok_or(Error::NotFound(*key))?;
        dest.write_all(&chunk)?;
        Ok(())
    }
}
