//! Identity assignment and duplicate detection.

use std::collections::HashSet;

use super::error::StoreError;
use crate::domain::Record;

/// One greater than the largest `id` present, or 1 for an empty collection.
///
/// Records without an integer `id` count as 0. Gaps are never filled.
pub fn next_id<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<i64, StoreError> {
    successor(max_id(records))
}

fn max_id<'a>(records: impl IntoIterator<Item = &'a Record>) -> i64 {
    records
        .into_iter()
        .filter_map(Record::id)
        .fold(0, i64::max)
}

fn successor(id: i64) -> Result<i64, StoreError> {
    id.checked_add(1).ok_or(StoreError::IdsExhausted(id))
}

/// Normalized `(title, prompt)` pair used to detect duplicate ideas
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub title: String,
    pub prompt: String,
}

impl DedupKey {
    /// Trimmed, lowercased title and prompt of a record
    pub fn of(record: &Record) -> Self {
        Self {
            title: normalize(record.title()),
            prompt: normalize(record.prompt()),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Set of dedup keys seen so far (existing collection plus accepted items)
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<DedupKey>,
}

impl DedupIndex {
    /// Seed the index from an existing collection
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        Self {
            seen: records.into_iter().map(DedupKey::of).collect(),
        }
    }

    pub fn contains(&self, key: &DedupKey) -> bool {
        self.seen.contains(key)
    }

    /// Record a key; returns false if it was already present
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Hands out ids from a running maximum
#[derive(Debug, Clone, Copy)]
pub struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    /// Continue after the largest id in `records`
    pub fn after<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        Self {
            last: max_id(records),
        }
    }

    pub fn allocate(&mut self) -> Result<i64, StoreError> {
        self.last = successor(self.last)?;
        Ok(self.last)
    }
}
