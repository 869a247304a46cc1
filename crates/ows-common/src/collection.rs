//! Time-indexed collections of raster payloads and dataset references.

use chrono::{DateTime, Utc};

use crate::band::PixelGrid;

/// One time slice: a timestamp and the payload retrieved for it.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeData<P> {
    pub time: DateTime<Utc>,
    pub data: P,
}

/// Insertion-ordered, append-only sequence of time slices.
///
/// Entries are never reordered or removed; callers append in whatever order
/// the query produced, chronological in practice. Not for concurrent
/// writers; build one collection per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCollection<P> {
    entries: Vec<TimeData<P>>,
}

impl<P> DataCollection<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a time slice. No deduplication, no reordering.
    pub fn add_time(&mut self, time: DateTime<Utc>, data: P) {
        self.entries.push(TimeData { time, data });
    }

    /// Number of time slices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload of the first slice, unwrapped for queries the caller has
    /// constrained to a single expected timestep.
    pub fn collapse_to_single(&self) -> Option<&P> {
        self.entries.first().map(|entry| &entry.data)
    }

    /// Payloads in insertion order, timestamps discarded.
    ///
    /// For reductions that rely on the inserted order being chronological,
    /// e.g. most-recent-pixel compositing.
    pub fn data_list(&self) -> Vec<&P> {
        self.entries.iter().map(|entry| &entry.data).collect()
    }

    /// Iterate time slices in insertion order. Every call starts an
    /// independent cursor.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeData<P>> {
        self.entries.iter()
    }
}

impl<P: PixelGrid> DataCollection<P> {
    /// (height, width) of the first payload, `None` when empty.
    ///
    /// All payloads are assumed to share one grid shape; the caller
    /// guarantees that before asking.
    pub fn pixel_counts(&self) -> Option<(usize, usize)> {
        self.entries.first().map(|entry| entry.data.pixel_counts())
    }
}

impl<P> Default for DataCollection<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P> IntoIterator for &'a DataCollection<P> {
    type Item = &'a TimeData<P>;
    type IntoIter = std::slice::Iter<'a, TimeData<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One time slice holding the dataset references that landed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDatasets<D> {
    pub time: DateTime<Utc>,
    pub datasets: Vec<D>,
}

impl<D> TimeDatasets<D> {
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Dataset references grouped per timestamp.
///
/// Length counts datasets across all timestamps, not timestamps. Reference
/// sets are stored as given; deduplication is the caller's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCollection<D> {
    entries: Vec<TimeDatasets<D>>,
}

impl<D> DatasetCollection<D> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append the dataset set observed at one timestamp.
    pub fn add_time(&mut self, time: DateTime<Utc>, datasets: Vec<D>) {
        self.entries.push(TimeDatasets { time, datasets });
    }

    /// Total dataset count across all timestamps.
    pub fn len(&self) -> usize {
        self.entries.iter().map(TimeDatasets::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Datasets of the first timestamp, `None` when no entries exist.
    pub fn collapse_to_single(&self) -> Option<&[D]> {
        self.entries.first().map(|entry| entry.datasets.as_slice())
    }

    /// Per-timestamp dataset sets in insertion order, timestamps discarded.
    pub fn data_list(&self) -> Vec<&[D]> {
        self.entries
            .iter()
            .map(|entry| entry.datasets.as_slice())
            .collect()
    }

    /// Iterate per-timestamp entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeDatasets<D>> {
        self.entries.iter()
    }
}

impl<D> Default for DatasetCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, D> IntoIterator for &'a DatasetCollection<D> {
    type Item = &'a TimeDatasets<D>;
    type IntoIter = std::slice::Iter<'a, TimeDatasets<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
