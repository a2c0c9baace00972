use std::{io, path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::info;

use cdcas::{
    serve::{Server, SharedReader},
    system, CachingReader, ChainedReader, Config, Key, LocalStore, RemoteReader,
};

use crate::cli::{Cli, Command};

pub fn run_command(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    match &cli.command {
        Command::Prepare => prepare(&config),
        Command::Pull(args) => {
            args.apply(&mut config);
            pull(&config, &args.root)
        }
        Command::Serve(args) => {
            args.apply(&mut config);
            serve(&config)
        }
    }
}

fn open_store(config: &Config) -> Result<Arc<LocalStore>> {
    let store = LocalStore::open(&config.store_dir)
        .with_context(|| format!("opening store at {}", config.store_dir.display()))?;
    Ok(Arc::new(store))
}

/// Local store first, then the remote (cached into the local store unless
/// caching is off) when one is configured.
fn reader_chain(config: &Config, local: Arc<LocalStore>) -> Result<ChainedReader> {
    let mut chain = ChainedReader::new().with(local.clone());
    if let Some(url) = &config.remote {
        let remote = match config.remote_timeout() {
            Some(timeout) => RemoteReader::with_timeout(url.as_str(), timeout),
            None => RemoteReader::new(url.as_str()),
        }
        .with_context(|| format!("setting up remote {url}"))?;

        if config.cache_remote {
            chain.push(CachingReader::new(remote, local));
        } else {
            chain.push(remote);
        }
    }
    Ok(chain)
}

fn prepare(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    system::prepare(
        &mut io::stdout().lock(),
        io::stdin().lock(),
        &store,
        &config.chunker(),
    )
    .context("preparing standard input")?;

    let stats = store.stats();
    info!(
        written = stats.writes,
        deduplicated = stats.deduplicated,
        "store updated"
    );
    Ok(())
}

fn pull(config: &Config, root: &Key) -> Result<()> {
    let output = config
        .output
        .as_deref()
        .context("pull needs an output path (-o), use - for standard output")?;
    let chain = reader_chain(config, open_store(config)?)?;

    let pulled = if output == Path::new("-") {
        system::pull_to_writer(root, &mut io::stdout().lock(), &chain)
    } else {
        system::pull(root, output, &chain)
    };
    info!(hits = %chain.hit_summary(), "chunk sources");

    pulled.with_context(|| format!("pulling {root}"))?;
    Ok(())
}

/// The local store, chained to the remote when one is configured.
fn serve_reader(config: &Config) -> Result<SharedReader> {
    let local = open_store(config)?;
    Ok(if config.remote.is_some() {
        Arc::new(reader_chain(config, local)?)
    } else {
        local
    })
}

fn serve(config: &Config) -> Result<()> {
    let reader = serve_reader(config)?;

    let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
    let served = runtime.block_on(Server::new(config.listen, reader.clone()).serve());
    // The remote reader's blocking client must be dropped outside the runtime.
    drop(runtime);
    drop(reader);

    served.with_context(|| format!("serving on {}", config.listen))
}
