use std::{io::Read, ops::RangeInclusive};

use bytes::Bytes;
use fastcdc::v2020::{
    self, Normalization, StreamCDC, AVERAGE_MAX, AVERAGE_MIN, MAXIMUM_MAX, MAXIMUM_MIN,
    MINIMUM_MAX, MINIMUM_MIN,
};

use super::{
    error::{Error, Result},
    pol::Pol,
};

pub const DEFAULT_POLYNOMIAL: Pol = Pol(0x2652bce9495479);
pub const DEFAULT_MIN_SIZE: usize = 64 * 1024;
pub const DEFAULT_AVERAGE_SIZE: usize = DEFAULT_MIN_SIZE * 4;
pub const DEFAULT_MAX_SIZE: usize = DEFAULT_AVERAGE_SIZE * 4;

/// Boundary parameters. Changing any of them changes every chunk boundary,
/// so stores written with one configuration deduplicate poorly against
/// streams prepared with another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Seeds the rolling hash's gear table.
    pub polynomial: Pol,
    pub min_size: usize,
    /// Size the boundary test is normalized around.
    pub average_size: usize,
    pub max_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            polynomial: DEFAULT_POLYNOMIAL,
            min_size: DEFAULT_MIN_SIZE,
            average_size: DEFAULT_AVERAGE_SIZE,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Sizes in the form `StreamCDC` takes them.
struct Sizes {
    min: u32,
    avg: u32,
    max: u32,
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<()> {
        self.sizes().map(|_| ())
    }

    fn sizes(&self) -> Result<Sizes> {
        let sizes = Sizes {
            min: bounded("minimum", self.min_size, MINIMUM_MIN..=MINIMUM_MAX)?,
            avg: bounded("average", self.average_size, AVERAGE_MIN..=AVERAGE_MAX)?,
            max: bounded("maximum", self.max_size, MAXIMUM_MIN..=MAXIMUM_MAX)?,
        };
        if sizes.min > sizes.avg || sizes.avg > sizes.max {
            return Err(Error::InvalidConfig(format!(
                "chunk sizes must satisfy minimum <= average <= maximum, got {} / {} / {}",
                self.min_size, self.average_size, self.max_size
            )));
        }
        Ok(sizes)
    }
}

fn bounded(name: &str, size: usize, range: RangeInclusive<u32>) -> Result<u32> {
    u32::try_from(size)
        .ok()
        .filter(|size| range.contains(size))
        .ok_or_else(|| {
            Error::InvalidConfig(format!(
                "{name} chunk size {size} is outside {}..={}",
                range.start(),
                range.end()
            ))
        })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the first byte in the source stream.
    pub offset: u64,
    pub data: Bytes,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Splits a byte stream into content-defined chunks with FastCDC.
///
/// The iterator is lazy and not restartable: once it yields an error or
/// reaches the end of the stream it only returns `None`.
pub struct Chunker<R: Read> {
    inner: StreamCDC<R>,
    done: bool,
}

impl<R: Read> Chunker<R> {
    pub fn new(reader: R, config: &ChunkerConfig) -> Result<Self> {
        let Sizes { min, avg, max } = config.sizes()?;

        Ok(Self {
            inner: StreamCDC::with_level_and_seed(
                reader,
                min,
                avg,
                max,
                Normalization::Level1,
                config.polynomial.0,
            ),
            done: false,
        })
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(chunk)) => Some(Ok(Chunk {
                offset: chunk.offset,
                data: Bytes::from(chunk.data),
            })),
            None | Some(Err(v2020::Error::Empty)) => {
                self.done = true;
                None
            }
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
