use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use cdcas::{chunker::Pol, Config, Key};

#[derive(Parser)]
#[command(
    name = "cdcas",
    about = "Content-defined chunk store: split streams into deduplicated chunks and rebuild them",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to store chunks in
    #[arg(long, global = true)]
    pub cas_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    pub min_chunk_size: Option<usize>,

    #[arg(long, global = true)]
    pub average_chunk_size: Option<usize>,

    #[arg(long, global = true)]
    pub max_chunk_size: Option<usize>,

    /// Boundary polynomial, 0x-prefixed hex
    #[arg(long, global = true)]
    pub polynomial: Option<Pol>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Chunk standard input into the store and print its root hash
    Prepare,
    /// Rebuild a stream from its root hash
    Pull(PullArgs),
    /// Serve the store over HTTP
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct PullArgs {
    /// Root hash printed by `prepare`
    pub root: Key,

    /// Output file, `-` for standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// URL of a chunk server to fetch missing chunks from
    #[arg(long)]
    pub cas_addr: Option<String>,

    /// Do not keep fetched chunks in the local store
    #[arg(long)]
    pub no_cache: bool,

    /// Give up on a remote request after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// URL of a chunk server to fetch (and cache) chunks missing locally
    #[arg(long)]
    pub cas_addr: Option<String>,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.cas_dir {
            config.store_dir = dir.clone();
        }
        if let Some(size) = self.min_chunk_size {
            config.min_chunk_size = size;
        }
        if let Some(size) = self.average_chunk_size {
            config.average_chunk_size = size;
        }
        if let Some(size) = self.max_chunk_size {
            config.max_chunk_size = size;
        }
        if let Some(polynomial) = self.polynomial {
            config.polynomial = polynomial;
        }
    }
}

impl PullArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(addr) = &self.cas_addr {
            config.remote = Some(addr.clone());
        }
        if self.no_cache {
            config.cache_remote = false;
        }
        if let Some(timeout) = self.timeout {
            config.remote_timeout_secs = Some(timeout);
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(addr) = &self.cas_addr {
            config.remote = Some(addr.clone());
        }
    }
}
