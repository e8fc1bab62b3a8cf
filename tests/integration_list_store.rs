//! List store integration tests
//!
//! Drives the public API end to end against file-backed and in-memory slots.

use eyre::Result;
use planner::{
    Category, DEFAULT_STORAGE_KEY, FileKv, KvStore, ListStore, MemoryKv, PlannerState, REVIEW_LABELS, SequentialIds,
    SteppingClock, SystemClock, load,
};
use std::collections::HashSet;
use tempfile::TempDir;

fn open<K: KvStore>(kv: K) -> ListStore<K> {
    ListStore::open_with(
        kv,
        DEFAULT_STORAGE_KEY,
        Box::new(SequentialIds::new("t")),
        Box::new(SteppingClock::new(1_700_000_000_000, 1)),
    )
}

/// Add, edit, complete and view a single daily task
#[test]
fn test_daily_task_walkthrough() {
    let mut store = open(MemoryKv::new());

    let id = store.add_item(Category::Daily);
    let daily = store.items(Category::Daily);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].text, "");
    assert!(!daily[0].completed);

    store.update_text(Category::Daily, &id, "Buy milk");
    assert_eq!(store.items(Category::Daily)[0].text, "Buy milk");

    store.toggle_item(Category::Daily, &id);
    assert!(store.items(Category::Daily)[0].completed);

    let view = store.sorted_view(Category::Daily);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].id, id);
}

/// A corrupt snapshot falls back to the seeded default state
#[test]
fn test_load_invalid_blob_returns_default() {
    let kv = MemoryKv::new().with(DEFAULT_STORAGE_KEY, "{not json");
    let state = load(&kv, DEFAULT_STORAGE_KEY, &SteppingClock::new(5, 0));
    assert_eq!(state, PlannerState::seeded(5));
}

/// A written snapshot loads back into an equal state
#[test]
fn test_snapshot_round_trip() -> Result<()> {
    let temp = TempDir::new()?;

    let written = {
        let mut store = open(FileKv::open(temp.path())?);
        for category in Category::ALL {
            let id = store.add_item(category);
            store.update_text(category, &id, format!("{} task", category));
        }
        let id = store.add_item(Category::Yearly);
        store.toggle_item(Category::Yearly, &id);
        store.toggle_item(Category::Review, "fixed-7");
        store.state().clone()
    };

    let kv = FileKv::open(temp.path())?;
    let loaded = load(&kv, DEFAULT_STORAGE_KEY, &SystemClock);
    assert_eq!(loaded, written);

    Ok(())
}

/// Snapshot field names match the persisted format
#[test]
fn test_snapshot_format() -> Result<()> {
    let mut store = open(MemoryKv::new());
    let id = store.add_item(Category::Monthly);
    store.update_text(Category::Monthly, &id, "rent");

    let blob = store.kv().read(DEFAULT_STORAGE_KEY)?.expect("snapshot written");
    let value: serde_json::Value = serde_json::from_str(&blob)?;

    for category in ["daily", "monthly", "review", "yearly"] {
        assert!(value[category].is_array(), "missing {}", category);
    }
    let item = &value["monthly"][0];
    assert_eq!(item["id"], id.as_str());
    assert_eq!(item["text"], "rent");
    assert_eq!(item["completed"], false);
    assert!(item["timestamp"].is_i64());

    Ok(())
}

/// A snapshot missing some lists loads with those lists empty
#[test]
fn test_partial_snapshot_fills_missing_lists() {
    let kv = MemoryKv::new().with(
        DEFAULT_STORAGE_KEY,
        r#"{"daily":[{"id":"a","text":"x","completed":true,"timestamp":3}]}"#,
    );
    let store = open(kv);

    assert_eq!(store.items(Category::Daily).len(), 1);
    assert!(store.items(Category::Daily)[0].completed);
    assert!(store.items(Category::Review).is_empty());
}

/// Review reset restores the labels and issues new ids
#[test]
fn test_reset_review() {
    let mut store = open(MemoryKv::new());
    for id in ["fixed-0", "fixed-3", "fixed-8"] {
        store.toggle_item(Category::Review, id);
    }
    let previous: HashSet<String> = store.items(Category::Review).iter().map(|i| i.id.clone()).collect();

    store.reset_review();

    let review = store.items(Category::Review);
    let texts: Vec<&str> = review.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, REVIEW_LABELS.to_vec());
    assert!(review.iter().all(|i| !i.completed));
    assert!(review.iter().all(|i| !previous.contains(&i.id)));
}

/// Deletes only count when the id exists
#[test]
fn test_adds_minus_deletes() {
    let mut store = open(MemoryKv::new());
    let ids: Vec<String> = (0..5).map(|_| store.add_item(Category::Monthly)).collect();

    store.delete_item(Category::Monthly, &ids[1]);
    store.delete_item(Category::Monthly, &ids[1]);
    store.delete_item(Category::Monthly, "nope");
    store.delete_item(Category::Daily, &ids[2]);
    store.delete_item(Category::Monthly, &ids[4]);

    assert_eq!(store.items(Category::Monthly).len(), 3);
}
