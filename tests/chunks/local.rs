use std::{fs, sync::Arc, thread};

use cdcas::{chunks::StoreStats, ChunkReader, ChunkWriter, Key, LocalStore};

use crate::utils::random_bytes;

#[test_log::test]
fn concurrent_writers_of_the_same_chunk_agree() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::open(dir.path()).unwrap());
    let chunk = random_bytes(256 * 1024, 1);
    let key = Key::of(&chunk);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let chunk = chunk.clone();
            thread::spawn(move || store.store(&chunk).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), key);
    }

    let mut buf: Vec<u8> = Vec::new();
    store.copy(&mut buf, &key).unwrap();
    assert_eq!(buf, chunk);

    let StoreStats {
        writes,
        deduplicated,
    } = store.stats();
    assert!(writes >= 1);
    assert_eq!(writes + deduplicated, 8);

    // Only the chunk itself is left, no temporary files.
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec![key.to_string()]);
}

#[test_log::test]
fn readers_see_whole_chunks_while_writers_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::open(dir.path()).unwrap());
    let chunks: Vec<Vec<u8>> = (0..16).map(|seed| random_bytes(64 * 1024, seed)).collect();
    let keys: Vec<Key> = chunks.iter().map(|chunk| Key::of(chunk)).collect();

    let writer = {
        let store = store.clone();
        let chunks = chunks.clone();
        thread::spawn(move || {
            for chunk in &chunks {
                store.store(chunk).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let chunks = chunks.clone();
            let keys = keys.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    for (key, chunk) in keys.iter().zip(&chunks) {
                        let mut buf: Vec<u8> = Vec::new();
                        match store.copy(&mut buf, key) {
                            Ok(()) => assert_eq!(&buf, chunk),
                            Err(e) => assert!(e.is_not_found(), "unexpected error: {e}"),
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    for (key, chunk) in keys.iter().zip(&chunks) {
        let mut buf: Vec<u8> = Vec::new();
        store.copy(&mut buf, key).unwrap();
        assert_eq!(&buf, chunk);
    }
}

#[test_log::test]
fn store_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let chunk = b"Hello World!".repeat(1_000);

    let key = LocalStore::open(dir.path()).unwrap().store(&chunk).unwrap();

    let reopened = LocalStore::open(dir.path()).unwrap();
    assert!(reopened.contains(&key).unwrap());
    assert_eq!(reopened.store(&chunk).unwrap(), key);
    assert_eq!(
        reopened.stats(),
        StoreStats {
            writes: 0,
            deduplicated: 1
        }
    );
}
