use core::fmt;
use std::{
    io::Write,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use super::{
    error::{Error, Result},
    key::Key,
    traits::ChunkReader,
};

/// Reads from a sequence of readers, falling through to the next one only
/// when the current one does not have the chunk.
///
/// Any error other than [`Error::NotFound`] stops the chain and is returned
/// as is, so a broken source is never masked by a later one.
#[derive(Debug, Default)]
pub struct ChainedReader {
    readers: Vec<Box<dyn ChunkReader>>,
    hits: Vec<AtomicU64>,
}

impl ChainedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reader: impl ChunkReader + 'static) -> Self {
        self.push(reader);
        self
    }

    pub fn push(&mut self, reader: impl ChunkReader + 'static) {
        self.readers.push(Box::new(reader));
        self.hits.push(AtomicU64::new(0));
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Successful reads served by each reader, in chain order. Counts are
    /// advisory under concurrent use.
    pub fn hits(&self) -> Vec<u64> {
        self.hits
            .iter()
            .map(|hits| hits.load(Ordering::Relaxed))
            .collect()
    }

    /// Share of successful reads served by each reader.
    pub fn hit_summary(&self) -> HitSummary {
        HitSummary(self.hits())
    }
}

impl ChunkReader for ChainedReader {
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        let mut last = Error::NotFound(*key);
        for (i, reader) in self.readers.iter().enumerate() {
            match reader.copy(dest, key) {
                Ok(()) => {
                    self.hits[i].fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                Err(e) if e.is_not_found() => {
                    debug!(%key, source = i, "chunk not in source, trying next");
                    last = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitSummary(pub Vec<u64>);

impl fmt::Display for HitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: u64 = self.0.iter().sum();
        for (i, hits) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let share = if total == 0 {
                0.0
            } else {
                *hits as f64 * 100.0 / total as f64
            };
            write!(f, "{share:.2}%")?;
        }
        Ok(())
    }
}
