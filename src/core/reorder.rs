//! Applying an explicit external ordering to a collection.

use std::collections::{HashMap, HashSet};

use crate::domain::Record;

/// Reorder `records` by `ordered_ids`.
///
/// Listed items come first in the given order, each with `order` set to its
/// position in `ordered_ids`. Unlisted items follow in their original
/// relative order with `order` untouched. Unknown ids are ignored, and an id
/// listed twice keeps its first position, so the result always holds exactly
/// the input items.
pub fn reorder(records: Vec<Record>, ordered_ids: &[i64]) -> Vec<Record> {
    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();

    let positions: HashMap<i64, usize> = slots
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(pos, r)| r.as_ref().and_then(Record::id).map(|id| (id, pos)))
        .collect();

    let mut result = Vec::with_capacity(slots.len());
    let mut placed: HashSet<i64> = HashSet::with_capacity(ordered_ids.len());

    for (index, id) in ordered_ids.iter().enumerate() {
        let Some(&pos) = positions.get(id) else {
            continue;
        };
        if !placed.insert(*id) {
            continue;
        }
        if let Some(mut record) = slots[pos].take() {
            record.set_order(index);
            result.push(record);
        }
    }

    result.extend(slots.into_iter().flatten());
    result
}
