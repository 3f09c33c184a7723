//! Newest-first, fixed-capacity history policy.

use crate::domain::{fields, now_millis, Record};

use super::error::StoreError;
use super::identity::next_id;

/// Insert `entry` at the front of `history` and evict past `capacity`.
///
/// The entry gets the next id; its `timestamp` is kept when the caller
/// supplied one and set to now otherwise. Returns the stored entry. A
/// capacity of 0 is treated as 1 so the new entry always survives.
pub fn push_front(
    history: &mut Vec<Record>,
    mut entry: Record,
    capacity: usize,
) -> Result<Record, StoreError> {
    entry.set_id(next_id(history.iter())?);

    let has_timestamp = entry
        .get(fields::TIMESTAMP)
        .map(|v| !v.is_null())
        .unwrap_or(false);
    if !has_timestamp {
        entry.insert(fields::TIMESTAMP, now_millis());
    }

    history.insert(0, entry.clone());
    history.truncate(capacity.max(1));
    Ok(entry)
}

/// Drop the entry with `id`; false when no entry matched
pub fn remove(history: &mut Vec<Record>, id: i64) -> bool {
    let before = history.len();
    history.retain(|entry| entry.id() != Some(id));
    history.len() < before
}
