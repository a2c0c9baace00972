use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chunker::{
    ChunkerConfig, Pol, DEFAULT_AVERAGE_SIZE, DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE,
    DEFAULT_POLYNOMIAL,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything the `prepare`, `pull` and `serve` entry points need.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the local chunk store.
    pub store_dir: PathBuf,
    pub min_chunk_size: usize,
    pub average_chunk_size: usize,
    pub max_chunk_size: usize,
    pub polynomial: Pol,
    /// Address `serve` listens on.
    pub listen: SocketAddr,
    /// Base URL of a remote chunk server to fall back to.
    pub remote: Option<String>,
    pub remote_timeout_secs: Option<u64>,
    /// Keep chunks fetched from the remote in the local store.
    pub cache_remote: bool,
    /// Where `pull` writes the stream; `-` is standard output.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("cas"),
            min_chunk_size: DEFAULT_MIN_SIZE,
            average_chunk_size: DEFAULT_AVERAGE_SIZE,
            max_chunk_size: DEFAULT_MAX_SIZE,
            polynomial: DEFAULT_POLYNOMIAL,
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            remote: None,
            remote_timeout_secs: None,
            cache_remote: true,
            output: None,
        }
    }
}

impl Config {
    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn chunker(&self) -> ChunkerConfig {
        ChunkerConfig {
            polynomial: self.polynomial,
            min_size: self.min_chunk_size,
            average_size: self.average_chunk_size,
            max_size: self.max_chunk_size,
        }
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_secs.map(Duration::from_secs)
    }
}
