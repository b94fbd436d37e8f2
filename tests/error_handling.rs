//! Error handling and edge case tests.

use history_store::{
    DropReason, HistoryConfig, HistoryError, HistoryEvent, HistoryStore, Revision,
    SubscriptionConfig, SubscriptionFilter, SubscriptionId,
};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

// --- Config Errors ---

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, r#"{"max_depth": 25, "event_buffer_size": 16}"#).unwrap();

    let config = HistoryConfig::from_path(&path).unwrap();
    assert_eq!(config, HistoryConfig::bounded(25).with_event_buffer_size(16));
}

#[test]
fn test_load_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let result = HistoryConfig::from_path(dir.path().join("missing.json"));

    assert!(matches!(result, Err(HistoryError::Io(_))));
}

#[test]
fn test_load_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, "max_depth = 25").unwrap();

    let result = HistoryConfig::from_path(&path);
    assert!(matches!(result, Err(HistoryError::Deserialization(_))));
}

#[test]
fn test_store_rejects_invalid_config() {
    let result = HistoryStore::with_config(0, HistoryConfig::default().with_event_buffer_size(0));
    assert!(matches!(result, Err(HistoryError::InvalidConfig(_))));
}

#[test]
fn test_error_messages() {
    let err = HistoryError::InvalidConfig("max_depth must be at least 1".to_string());
    assert_eq!(
        err.to_string(),
        "Invalid configuration: max_depth must be at least 1"
    );
}

// --- Boundary Navigation ---

#[test]
fn test_undo_redo_on_fresh_store() {
    let mut store = HistoryStore::new("seed");

    assert!(!store.undo());
    assert!(!store.redo());
    assert_eq!(*store.value(), "seed");
    assert_eq!(store.len(), 1);
}

// --- Equality Edge Cases ---

#[test]
fn test_unserializable_values_always_recorded() {
    let mut seed: HashMap<(u8, u8), &str> = HashMap::new();
    seed.insert((0, 0), "display");

    let mut store = HistoryStore::new(seed.clone());

    // Cannot be compared by serialization, so the write is kept
    assert!(store.set(seed));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_unicode_values() {
    let mut store = HistoryStore::new("Salle de réunion".to_string());
    assert!(!store.set("Salle de réunion".to_string()));
    assert!(store.set("会議室".to_string()));
    assert_eq!(store.value(), "会議室");
}

// --- Subscriptions ---

#[test]
fn test_unsubscribe_twice() {
    let store = HistoryStore::new(0);
    let handle = store.subscribe(SubscriptionConfig::default());

    store.unsubscribe(handle.id).unwrap();
    let result = store.unsubscribe(handle.id);
    assert!(matches!(result, Err(HistoryError::SubscriptionNotFound(_))));
}

#[test]
fn test_unsubscribe_unknown_id() {
    let store = HistoryStore::new(0);
    let result = store.unsubscribe(SubscriptionId(99));
    assert!(matches!(
        result,
        Err(HistoryError::SubscriptionNotFound(SubscriptionId(99)))
    ));
}

#[test]
fn test_slow_subscriber_dropped_writer_unaffected() {
    let mut store = HistoryStore::with_config(0, HistoryConfig::default()).unwrap();
    let handle = store.subscribe(SubscriptionConfig {
        buffer_size: Some(3),
        filter: SubscriptionFilter::writes(),
    });

    for i in 1..=10 {
        assert!(store.set(i));
    }

    assert_eq!(store.subscription_count(), 0);
    assert_eq!(*store.value(), 10);

    let events = handle.drain();
    assert_eq!(events.len(), 4);
    assert!(events[..3]
        .iter()
        .all(|e| matches!(e, HistoryEvent::Recorded { .. })));
    assert_eq!(
        events.last(),
        Some(&HistoryEvent::Dropped {
            reason: DropReason::BufferOverflow
        })
    );
}

#[test]
fn test_overflow_notice_arrives_last() {
    let mut store = HistoryStore::new(0);
    let handle = store.subscribe(SubscriptionConfig {
        buffer_size: Some(2),
        filter: SubscriptionFilter::all(),
    });

    for i in 1..=5 {
        store.set(i);
    }

    let revisions: Vec<_> = handle.drain().iter().map(|e| e.revision()).collect();
    assert_eq!(
        revisions,
        vec![Some(Revision(1)), Some(Revision(2)), None]
    );
}

#[test]
fn test_unsubscribe_with_full_buffer_notifies() {
    let mut store = HistoryStore::new(0);
    let handle = store.subscribe(SubscriptionConfig {
        buffer_size: Some(1),
        filter: SubscriptionFilter::writes(),
    });

    store.set(1);
    store.unsubscribe(handle.id).unwrap();

    assert_eq!(
        handle.drain().last(),
        Some(&HistoryEvent::Dropped {
            reason: DropReason::Unsubscribed
        })
    );
}

#[test]
fn test_dropped_handle_is_cleaned_up() {
    let mut store = HistoryStore::new(0);
    let handle = store.subscribe(SubscriptionConfig::default());
    drop(handle);

    store.set(1);
    assert_eq!(store.subscription_count(), 0);
}

#[test]
fn test_unsubscribe_notifies() {
    let store = HistoryStore::new(0);
    let handle = store.subscribe(SubscriptionConfig::default());
    store.unsubscribe(handle.id).unwrap();

    assert_eq!(
        handle.drain(),
        vec![HistoryEvent::Dropped {
            reason: DropReason::Unsubscribed
        }]
    );
}
