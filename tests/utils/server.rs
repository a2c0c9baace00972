use cdcas::serve::{serve_on, SharedReader};
use tokio::{net::TcpListener, runtime::Runtime, sync::oneshot};

/// Serves `reader` on an ephemeral local port while `f` runs, then shuts the
/// server down. `f` gets the base URL and runs outside the runtime, so it can
/// use blocking clients.
pub fn with_server_ready<T>(reader: SharedReader, f: T)
where
    T: FnOnce(String),
{
    let runtime = Runtime::new().expect("Should be able to start a runtime");
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .expect("Should be able to bind a local port");
    let addr = listener.local_addr().expect("Listener should have an address");

    let (stop, stopped) = oneshot::channel::<()>();
    let server = runtime.spawn(serve_on(listener, reader, async move {
        let _ = stopped.await;
    }));

    f(format!("http://{addr}"));

    let _ = stop.send(());
    runtime
        .block_on(server)
        .expect("Server task should not panic")
        .expect("Server should shut down cleanly");
}
