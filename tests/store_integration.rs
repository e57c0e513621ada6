//! Integration tests for the JSON-file session store
//!
//! Each test works in its own temporary directory; several reopen the store
//! to prove the documents, not the in-memory state, carry the data.

mod common;

use common::builders::SessionRecordBuilder;
use plantsense_rs::session::export;
use plantsense_rs::session::store::{JsonFileStore, SessionStore};
use plantsense_rs::types::{Marker, Sample};
use plantsense_rs::PlantSenseError;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::open(dir.path()).expect("store opens in temp dir")
}

#[test]
fn put_get_roundtrip_across_reopen() {
    let dir = TempDir::new().unwrap();
    let record = SessionRecordBuilder::new("1700000000000")
        .title("Greenhouse A")
        .samples_count(2)
        .summary(6.0, 7.0)
        .build();
    let samples = vec![Sample::new(0, 5.0), Sample::new(1_000, 7.0)];
    let markers = vec![Marker::new(500, "Stimulus")];

    store_in(&dir)
        .put(&record, &samples, &markers)
        .expect("put succeeds");

    let reopened = store_in(&dir);
    let loaded = reopened.get("1700000000000").unwrap().expect("present");
    assert_eq!(loaded.record, record);
    assert_eq!(loaded.samples, samples);
    assert_eq!(loaded.markers, markers);
}

#[test]
fn get_unknown_id_is_absent_not_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(store_in(&dir).get("nope").unwrap().is_none());
}

#[test]
fn id_collision_is_rejected_and_preserves_the_original() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    let original = SessionRecordBuilder::new("dup").title("Original").build();
    store
        .put(&original, &[Sample::new(0, 1.0)], &[])
        .unwrap();

    let intruder = SessionRecordBuilder::new("dup").title("Intruder").build();
    let err = store.put(&intruder, &[], &[]).unwrap_err();
    assert!(matches!(err, PlantSenseError::IdCollision(_)));

    let kept = store.get("dup").unwrap().unwrap();
    assert_eq!(kept.record.title, "Original");
    assert_eq!(kept.samples.len(), 1);
}

#[test]
fn listing_is_newest_first() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    for (id, start_ms) in [("old", 1_000), ("new", 3_000), ("mid", 2_000)] {
        let record = SessionRecordBuilder::new(id).started_at_ms(start_ms).build();
        store.put(&record, &[], &[]).unwrap();
    }

    let ids: Vec<String> = store
        .list_metadata()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn rename_changes_only_the_title_and_persists() {
    let dir = TempDir::new().unwrap();
    let record = SessionRecordBuilder::new("r1")
        .title("Before")
        .summary(1.0, 2.0)
        .build();
    store_in(&dir)
        .put(&record, &[Sample::new(0, 1.0)], &[])
        .unwrap();

    store_in(&dir).rename_title("r1", "After").unwrap();

    let loaded = store_in(&dir).get("r1").unwrap().unwrap();
    assert_eq!(loaded.record.title, "After");
    assert_eq!(loaded.record.avg, 1.0);
    assert_eq!(loaded.samples.len(), 1);

    let err = store_in(&dir).rename_title("ghost", "x").unwrap_err();
    assert!(matches!(err, PlantSenseError::SessionNotFound(_)));
}

#[test]
fn delete_removes_the_whole_logical_unit() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    let record = SessionRecordBuilder::new("gone").build();
    store
        .put(&record, &[Sample::new(0, 1.0)], &[Marker::new(0, "Touch")])
        .unwrap();
    let keep = SessionRecordBuilder::new("keep").build();
    store.put(&keep, &[], &[]).unwrap();

    store.delete("gone").unwrap();

    assert!(store.get("gone").unwrap().is_none());
    let ids: Vec<String> = store
        .list_metadata()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["keep"]);

    // Both child documents are gone from disk too.
    assert!(!dir.path().join("samples-gone.json").exists());
    assert!(!dir.path().join("markers-gone.json").exists());
    assert!(dir.path().join("samples-keep.json").exists());

    let err = store.delete("gone").unwrap_err();
    assert!(matches!(err, PlantSenseError::SessionNotFound(_)));
}

#[test]
fn export_writes_the_csv_next_to_the_caller() {
    let dir = TempDir::new().unwrap();
    let record = SessionRecordBuilder::new("exp")
        .title("Export me")
        .samples_count(1)
        .summary(5.0, 5.0)
        .build();
    let mut store = store_in(&dir);
    store
        .put(&record, &[Sample::new(0, 5.0)], &[Marker::new(10, "Light")])
        .unwrap();

    let session = store.get("exp").unwrap().unwrap();
    let out = dir.path().join(export::default_file_name("exp"));
    export::write_csv(&session, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Session ID,exp\n"));
    assert!(text.contains("\nSamples\nt_ms,value_mV\n0,5\n"));
    assert!(text.contains("\nMarkers\nt_ms,label\n10,Light\n"));
}
