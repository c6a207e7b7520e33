use std::sync::LazyLock;
use std::thread;

use crate::{AnyValue, Key, PersistentMap, RawKey, Record};

static COUNTER: LazyLock<Key<u64>> = LazyLock::new(|| Key::labeled("counter"));
static OWNER: LazyLock<Key<String>> = LazyLock::new(|| Key::labeled("owner"));

#[test]
fn record_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Record>();
    assert_send::<Key<String>>();
    assert_send::<AnyValue>();
    assert_send::<PersistentMap<RawKey, AnyValue>>();
}

#[test]
fn record_is_sync() {
    fn assert_sync<T: Sync>() {}
    assert_sync::<Record>();
    assert_sync::<Key<String>>();
    assert_sync::<AnyValue>();
    assert_sync::<PersistentMap<RawKey, AnyValue>>();
}

/// Threads derive from one shared record; none sees another's changes.
#[test]
fn derive_from_shared_record() {
    let base: Record = Record::new()
        .with(&OWNER, "root".to_owned())
        .with(&COUNTER, 0);

    let derived: Vec<Record> = thread::scope(|s| {
        let handles: Vec<_> = (1_u64..=16)
            .map(|n| {
                let base = &base;
                s.spawn(move || {
                    let mut r = base.clone();
                    for step in 1..=n {
                        r = r.with(&COUNTER, step);
                    }
                    r
                })
            })
            .collect();
        let mut derived = Vec::with_capacity(handles.len());
        for handle in handles {
            derived.push(handle.join().expect("worker panicked"));
        }
        derived
    });

    assert_eq!(base.get(&COUNTER), Some(&0));
    for (n, r) in (1_u64..).zip(&derived) {
        assert_eq!(r.get(&COUNTER), Some(&n));
        assert_eq!(r.get(&OWNER).map(String::as_str), Some("root"));
    }
}

/// Keys allocated concurrently are all distinct.
#[test]
fn concurrent_key_allocation() {
    let ids: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    (0..256)
                        .map(|_| Key::<u8>::new().id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.extend(handle.join().expect("worker panicked"));
        }
        ids
    });

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

/// A snapshot moved to another thread outlives the one it came from.
#[test]
fn snapshot_outlives_source_across_threads() {
    let source: PersistentMap<u64, u64> = (0_u64..500).map(|i| (i, i * 2)).collect();
    let shared = source.insert(1000, 1);
    drop(source);

    let handle = thread::spawn(move || {
        let trimmed = shared.remove(&1000);
        (shared.len(), trimmed.len(), trimmed.get(&250).copied())
    });
    let (shared_len, trimmed_len, probe) = handle.join().expect("worker panicked");

    assert_eq!(shared_len, 501);
    assert_eq!(trimmed_len, 500);
    assert_eq!(probe, Some(500));
}
