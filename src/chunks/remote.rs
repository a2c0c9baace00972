use std::{io, io::Write, time::Duration};

use reqwest::{blocking::Client, StatusCode};
use tracing::debug;

use super::{
    error::{Error, Result},
    key::Key,
    traits::ChunkReader,
};

/// Read-only access to a chunk store served over HTTP, fetching
/// `GET {base_url}/{key}`.
#[derive(Debug)]
pub struct RemoteReader {
    base_url: String,
    client: Client,
}

impl RemoteReader {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), Client::builder())
    }

    /// Like [`RemoteReader::new`], but gives up on requests that take longer
    /// than `timeout` end to end.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::build(base_url.into(), Client::builder().timeout(timeout))
    }

    fn build(base_url: String, builder: reqwest::blocking::ClientBuilder) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chunk_url(&self, key: &Key) -> String {
        format!("{}/{key}", self.base_url)
    }
}

impl ChunkReader for RemoteReader {
    /// Failing to connect or to get a response is [`Error::Transport`]. Once
    /// a `200` arrives, a connection lost while streaming the body surfaces
    /// as [`Error::Io`], after part of the chunk may have reached `dest`.
    fn copy(&self, dest: &mut dyn Write, key: &Key) -> Result<()> {
        let url = self.chunk_url(key);
        let mut response = self.client.get(&url).send()?;

        match response.status() {
            StatusCode::OK => {
                let size = io::copy(&mut response, dest)?;
                debug!(%key, size, %url, "fetched chunk");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound(*key)),
            status => Err(Error::UnexpectedStatus { url, status }),
        }
    }
}
