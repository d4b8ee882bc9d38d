use std::sync::Arc;
use std::thread;

use serde_json::{Value, json};
use tableview::store::{MemoryStore, SnapshotStore};

fn payload_of(name: &str) -> Value {
    json!({ "dataset": [{ "name": name }], "filterState": { "name": "" } })
}

#[test]
fn test_new_store_is_empty() {
    let store = MemoryStore::new();
    assert_eq!(store.load(), None);
}

#[test]
fn test_save_overwrites_wholesale() {
    let store = MemoryStore::new();
    store.save(payload_of("Apple"));
    store.save(payload_of("Banana"));

    assert_eq!(store.load(), Some(payload_of("Banana")));
    // Reads do not consume the slot
    assert_eq!(store.load(), Some(payload_of("Banana")));
}

#[test]
fn test_empty_snapshot_counts_as_saved() {
    let store = MemoryStore::new();
    let empty = json!({ "dataset": [], "filterState": {} });
    store.save(empty.clone());
    assert_eq!(store.load(), Some(empty));
}

#[test]
fn test_any_json_is_kept_as_is() {
    let store = MemoryStore::new();
    let odd = json!({ "dataset": [{ "price": 1, "sold": true }], "extra": [null, 2.5] });
    store.save(odd.clone());
    assert_eq!(store.load(), Some(odd));
    println!("✓ Payload with non-string cells and extra fields stored unchanged");
}

#[test]
fn test_concurrent_savers_leave_one_whole_snapshot() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
    let names: Vec<String> = (0..8).map(|i| format!("writer{i}")).collect();

    let handles: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.save(payload_of(&name)))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let saved = store.load().unwrap();
    let winner = saved["dataset"][0]["name"].as_str().unwrap().to_string();
    assert!(names.contains(&winner));
    assert_eq!(saved, payload_of(&winner));
}
