//! Comprehensive tests for time-indexed data collections.

use chrono::{DateTime, TimeZone, Utc};
use ows_common::{Band, BandSet, DataCollection, DatasetCollection};

fn t(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

fn bandset(height: usize, width: usize) -> BandSet {
    let mut set = BandSet::new(height, width);
    set.insert(
        "red",
        Band::new(vec![0; height * width], height, width, Some(-999)).unwrap(),
    )
    .unwrap();
    set
}

// ============================================================================
// Count and emptiness
// ============================================================================

#[test]
fn test_count_tracks_adds() {
    let mut collection = DataCollection::new();
    assert!(collection.is_empty());

    for i in 0..5 {
        collection.add_time(t(i), i);
        assert_eq!(collection.len(), (i + 1) as usize);
    }
    assert!(!collection.is_empty());
}

#[test]
fn test_duplicate_timestamps_kept() {
    let mut collection = DataCollection::new();
    collection.add_time(t(0), "a");
    collection.add_time(t(0), "b");
    // No deduplication: two entries at the same timestamp.
    assert_eq!(collection.len(), 2);
}

// ============================================================================
// Collapse and listing
// ============================================================================

#[test]
fn test_collapse_to_single_first_entry() {
    let mut collection = DataCollection::new();
    collection.add_time(t(3), "march");
    collection.add_time(t(4), "april");
    assert_eq!(collection.collapse_to_single(), Some(&"march"));
}

#[test]
fn test_collapse_to_single_empty_is_absent_not_error() {
    let collection: DataCollection<&str> = DataCollection::new();
    assert_eq!(collection.collapse_to_single(), None);
}

#[test]
fn test_data_list_drops_timestamps_keeps_order() {
    let mut collection = DataCollection::new();
    collection.add_time(t(2), 20);
    collection.add_time(t(1), 10);
    collection.add_time(t(3), 30);
    assert_eq!(collection.data_list(), vec![&20, &10, &30]);
}

// ============================================================================
// Pixel counts
// ============================================================================

#[test]
fn test_pixel_counts_from_first_entry() {
    let mut collection = DataCollection::new();
    collection.add_time(t(0), bandset(256, 512));
    collection.add_time(t(1), bandset(256, 512));
    assert_eq!(collection.pixel_counts(), Some((256, 512)));
}

#[test]
fn test_pixel_counts_empty() {
    let collection: DataCollection<BandSet> = DataCollection::new();
    assert_eq!(collection.pixel_counts(), None);
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_iteration_in_insertion_order() {
    let mut collection = DataCollection::new();
    collection.add_time(t(5), "late");
    collection.add_time(t(1), "early");

    let times: Vec<_> = collection.iter().map(|entry| entry.time).collect();
    assert_eq!(times, vec![t(5), t(1)]);
}

#[test]
fn test_iteration_is_restartable() {
    let mut collection = DataCollection::new();
    collection.add_time(t(0), 1);
    collection.add_time(t(1), 2);

    let mut cursor_a = collection.iter();
    let mut cursor_b = collection.iter();
    assert_eq!(cursor_a.next().map(|e| e.data), Some(1));
    // An independent cursor starts from the beginning.
    assert_eq!(cursor_b.next().map(|e| e.data), Some(1));
    assert_eq!(cursor_a.next().map(|e| e.data), Some(2));
    assert_eq!(cursor_a.next(), None);
}

#[test]
fn test_for_loop_over_reference() {
    let mut collection = DataCollection::new();
    collection.add_time(t(0), 7);

    let mut seen = 0;
    for entry in &collection {
        seen += entry.data;
    }
    assert_eq!(seen, 7);
}

// ============================================================================
// Dataset collections
// ============================================================================

#[test]
fn test_dataset_collection_len_sums_sets() {
    let mut collection = DatasetCollection::new();
    collection.add_time(t(0), vec!["ds-1", "ds-2"]);
    collection.add_time(t(6), vec!["ds-3", "ds-4", "ds-5"]);

    // Three add calls would be 3 timestamps; the count is 5 datasets.
    assert_eq!(collection.len(), 5);
    assert_eq!(collection.iter().count(), 2);
}

#[test]
fn test_dataset_collection_collapse() {
    let mut collection = DatasetCollection::new();
    assert!(collection.collapse_to_single().is_none());

    collection.add_time(t(0), vec!["ds-1", "ds-2"]);
    collection.add_time(t(6), vec!["ds-3"]);
    assert_eq!(collection.collapse_to_single(), Some(&["ds-1", "ds-2"][..]));
}
