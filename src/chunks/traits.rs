use core::fmt::Debug;
use std::{io::Write, sync::Arc};

use super::{error::Result, key::Key};

/// Something chunks can be fetched from.
pub trait ChunkReader: Debug + Send + Sync {
    /// Writes the chunk stored under `key` to `dest`.
    ///
    /// On failure `dest` may already hold a prefix of the chunk.
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()>;
}

/// Something chunks can be stored into.
pub trait ChunkWriter: Debug + Send + Sync {
    /// Stores `data` and returns its key. Storing content that is already
    /// present succeeds without writing it again.
    fn store(&self, data: &[u8]) -> Result<Key>;
}

pub trait ChunkStore: ChunkReader + ChunkWriter {}

impl<T: ChunkReader + ChunkWriter + ?Sized> ChunkStore for T {}

impl<T: ChunkReader + ?Sized> ChunkReader for &T {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        (**self).copy(dest, key)
    }
}

impl<T: ChunkReader + ?Sized> ChunkReader for Arc<T> {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        (**self).copy(dest, key)
    }
}

impl<T: ChunkReader + ?Sized> ChunkReader for Box<T> {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        (**self).copy(dest, key)
    }
}

impl<T: ChunkWriter + ?Sized> ChunkWriter for &T {
    fn store(&self, data: &[u8]) -> Result<Key> {
        (**self).store(data)
    }
}

impl<T: ChunkWriter + ?Sized> ChunkWriter for Arc<T> {
    fn store(&self, data: &[u8]) -> Result<Key> {
        (**self).store(data)
    }
}

impl<T: ChunkWriter + ?Sized> ChunkWriter for Box<T> {
    fn store(&self, data: &[u8]) -> Result<Key> {
        (**self).store(data)
    }
}
