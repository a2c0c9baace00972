use std::{future::Future, io, net::SocketAddr};

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::router::{router, SharedReader};

/// HTTP chunk server.
pub struct Server {
    listen: SocketAddr,
    reader: SharedReader,
}

impl Server {
    pub fn new(listen: SocketAddr, reader: SharedReader) -> Self {
        Self { listen, reader }
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.listen).await?;
        info!("serving chunks on {}", listener.local_addr()?);
        serve_on(listener, self.reader, ctrl_c()).await
    }
}

/// Serve requests on an already bound listener until `shutdown` completes.
pub async fn serve_on<F>(listener: TcpListener, reader: SharedReader, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(reader))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await
        }
    }
}
