use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::Arc,
    thread,
    time::Duration,
};

use cdcas::{
    chunks::{self, Error},
    CachingReader, ChainedReader, ChunkReader, ChunkWriter, Key, LocalStore, MemoryChunkStore,
    RemoteReader,
};

use crate::utils::{random_bytes, with_server_ready};

/// Answers every read with an I/O error, which the server reports as a 500.
#[derive(Debug)]
struct Broken;

impl ChunkReader for Broken {
    fn copy(&self, _dest: &mut dyn Write, _key: &Key) -> chunks::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into())
    }
}

#[test_log::test]
fn it_fetches_served_chunks() {
    let store = Arc::new(MemoryChunkStore::new());
    let chunk = random_bytes(300 * 1024, 7);
    let key = store.store(&chunk).unwrap();

    with_server_ready(store, |url| {
        let remote = RemoteReader::new(format!("{url}/")).unwrap();
        assert_eq!(remote.base_url(), url);

        let mut buf: Vec<u8> = Vec::new();
        remote.copy(&mut buf, &key).unwrap();
        assert_eq!(buf, chunk);
    });
}

#[test_log::test]
fn missing_chunks_are_not_found() {
    with_server_ready(Arc::new(MemoryChunkStore::new()), |url| {
        let remote = RemoteReader::with_timeout(url, Duration::from_secs(5)).unwrap();
        let key = Key::of(b"nobody stored this");

        let err = remote.copy(&mut std::io::sink(), &key).unwrap_err();
        assert!(matches!(err, Error::NotFound(k) if k == key));
    });
}

#[test_log::test]
fn server_failures_are_unexpected_statuses() {
    with_server_ready(Arc::new(Broken), |url| {
        let remote = RemoteReader::new(url.as_str()).unwrap();

        match remote.copy(&mut std::io::sink(), &Key::of(b"x")) {
            Err(Error::UnexpectedStatus { url: failed, status }) => {
                assert_eq!(failed, format!("{url}/{}", Key::of(b"x")));
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected an unexpected status, got {other:?}"),
        }
    });
}

#[test_log::test]
fn unreachable_servers_are_transport_errors() {
    // Bind and drop a listener to find a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let remote = RemoteReader::new(format!("http://127.0.0.1:{port}")).unwrap();

    let err = remote
        .copy(&mut std::io::sink(), &Key::of(b"x"))
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert!(!err.is_not_found());
}

#[test_log::test]
fn truncated_bodies_are_io_errors() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\nonly ten b")
            .unwrap();
    });

    let remote = RemoteReader::new(format!("http://{addr}")).unwrap();
    let err = remote
        .copy(&mut std::io::sink(), &Key::of(b"x"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
    assert!(!err.is_not_found());

    server.join().unwrap();
}

#[test_log::test]
fn fetched_chunks_are_cached_locally() {
    let served = Arc::new(MemoryChunkStore::new());
    let chunk = random_bytes(100 * 1024, 3);
    let key = served.store(&chunk).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let local = Arc::new(LocalStore::open(dir.path()).unwrap());

    with_server_ready(served, |url| {
        let chain = ChainedReader::new()
            .with(local.clone())
            .with(CachingReader::new(RemoteReader::new(url).unwrap(), local.clone()));

        let mut buf: Vec<u8> = Vec::new();
        chain.copy(&mut buf, &key).unwrap();
        assert_eq!(buf, chunk);
        assert_eq!(chain.hits(), vec![0, 1]);

        buf.clear();
        chain.copy(&mut buf, &key).unwrap();
        assert_eq!(buf, chunk);
        assert_eq!(chain.hits(), vec![1, 1]);
    });

    // The server is gone; the local store alone must have the chunk.
    let mut buf: Vec<u8> = Vec::new();
    local.copy(&mut buf, &key).unwrap();
    assert_eq!(buf, chunk);
}

#[test_log::test]
fn served_chains_fall_back_through_the_server() {
    let upstream = Arc::new(MemoryChunkStore::new());
    let chunk = b"only upstream has this".repeat(100);
    let key = upstream.store(&chunk).unwrap();

    with_server_ready(upstream, |upstream_url| {
        let edge = Arc::new(MemoryChunkStore::new());
        let chain = Arc::new(
            ChainedReader::new()
                .with(edge.clone())
                .with(CachingReader::new(
                    RemoteReader::new(upstream_url).unwrap(),
                    edge.clone(),
                )),
        );

        // Keep a handle so the blocking client is dropped on this thread.
        with_server_ready(chain.clone(), |edge_url| {
            let mut buf: Vec<u8> = Vec::new();
            RemoteReader::new(edge_url)
                .unwrap()
                .copy(&mut buf, &key)
                .unwrap();
            assert_eq!(buf, chunk);
        });

        assert!(edge.contains(&key));
        assert_eq!(chain.hits(), vec![0, 1]);
    });
}
