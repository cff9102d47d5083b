use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use wishdo_core::{
    decode_tasks, DebouncedWriter, FlushPolicy, KvStore, MemoryKvStore, TaskStore,
};

const KEY: &str = "TASKS_V2";
const WINDOW: Duration = Duration::from_millis(60);

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

#[test]
fn burst_of_mutations_produces_one_write_with_last_state() {
    let kv = Arc::new(MemoryKvStore::new());
    let writer =
        DebouncedWriter::spawn(kv.clone(), KEY, FlushPolicy::Debounced(WINDOW)).unwrap();
    let mut store = TaskStore::new();

    for round in 0..5 {
        store.add_at(&format!("task {round}"), round).unwrap();
        writer.schedule(store.tasks());
    }

    assert!(wait_until(Duration::from_secs(2), || kv.write_count() >= 1));
    thread::sleep(WINDOW * 3);
    assert_eq!(kv.write_count(), 1);

    let stored = decode_tasks(&kv.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_slice(), store.tasks());
    writer.shutdown();
}

#[test]
fn each_snapshot_restarts_the_quiet_window() {
    let window = Duration::from_millis(200);
    let gap = Duration::from_millis(80);
    let kv = Arc::new(MemoryKvStore::new());
    let writer = DebouncedWriter::spawn(kv.clone(), KEY, FlushPolicy::Debounced(window)).unwrap();
    let mut store = TaskStore::new();

    let started = Instant::now();
    for round in 0..5 {
        if round > 0 {
            thread::sleep(gap);
        }
        store.add_at(&format!("task {round}"), round).unwrap();
        writer.schedule(store.tasks());
    }
    // Snapshots span more than one window, but no gap reaches it.
    assert!(started.elapsed() > window);
    assert_eq!(kv.write_count(), 0);

    assert!(wait_until(Duration::from_secs(2), || kv.write_count() >= 1));
    thread::sleep(window * 2);
    assert_eq!(kv.write_count(), 1);

    let stored = decode_tasks(&kv.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_slice(), store.tasks());
    writer.shutdown();
}

#[test]
fn separated_bursts_write_once_each() {
    let kv = Arc::new(MemoryKvStore::new());
    let writer =
        DebouncedWriter::spawn(kv.clone(), KEY, FlushPolicy::Debounced(WINDOW)).unwrap();
    let mut store = TaskStore::new();

    store.add_at("first", 0).unwrap();
    writer.schedule(store.tasks());
    assert!(wait_until(Duration::from_secs(2), || kv.write_count() == 1));

    store.add_at("second", 1).unwrap();
    writer.schedule(store.tasks());
    assert!(wait_until(Duration::from_secs(2), || kv.write_count() == 2));

    let stored = decode_tasks(&kv.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 2);
}

#[test]
fn shutdown_discards_pending_write() {
    let kv = Arc::new(MemoryKvStore::new());
    let writer = DebouncedWriter::spawn(
        kv.clone(),
        KEY,
        FlushPolicy::Debounced(Duration::from_secs(5)),
    )
    .unwrap();
    let mut store = TaskStore::new();
    store.add_at("never flushed", 0).unwrap();

    writer.schedule(store.tasks());
    writer.shutdown();

    assert_eq!(kv.write_count(), 0);
    assert_eq!(kv.get(KEY).unwrap(), None);
}

#[test]
fn drop_discards_pending_write() {
    let kv = Arc::new(MemoryKvStore::new());
    {
        let writer = DebouncedWriter::spawn(
            kv.clone(),
            KEY,
            FlushPolicy::Debounced(Duration::from_secs(5)),
        )
        .unwrap();
        let mut store = TaskStore::new();
        store.add_at("dropped", 0).unwrap();
        writer.schedule(store.tasks());
    }

    assert_eq!(kv.write_count(), 0);
}

#[test]
fn immediate_policy_writes_every_snapshot() {
    let kv = Arc::new(MemoryKvStore::new());
    let writer = DebouncedWriter::spawn(kv.clone(), KEY, FlushPolicy::Immediate).unwrap();
    let mut store = TaskStore::new();

    for round in 0..3 {
        store.add_at(&format!("task {round}"), round).unwrap();
        writer.schedule(store.tasks());
    }

    assert!(wait_until(Duration::from_secs(2), || kv.write_count() == 3));
    let stored = decode_tasks(&kv.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
}

#[test]
fn failed_write_is_swallowed_and_next_mutation_retries() {
    let kv = Arc::new(MemoryKvStore::new());
    let writer =
        DebouncedWriter::spawn(kv.clone(), KEY, FlushPolicy::Debounced(WINDOW)).unwrap();
    let mut store = TaskStore::new();

    kv.set_fail_writes(true);
    store.add_at("lost write", 0).unwrap();
    writer.schedule(store.tasks());
    assert!(wait_until(Duration::from_secs(2), || kv.failed_write_count() == 1));
    assert_eq!(kv.get(KEY).unwrap(), None);

    kv.set_fail_writes(false);
    store.add_at("retry", 1).unwrap();
    writer.schedule(store.tasks());
    assert!(wait_until(Duration::from_secs(2), || kv.write_count() == 1));

    let stored = decode_tasks(&kv.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_slice(), store.tasks());
}
