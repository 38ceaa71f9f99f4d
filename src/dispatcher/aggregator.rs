//! Reassembles completion-ordered task results into input order.

use crate::error::ConsistencyError;
use crate::types::{BatchResult, Outcome, TaskResult};

/// Place every outcome in the slot of its index.
///
/// Each slot is written at most once; a duplicate, out-of-range, or missing index
/// means the scheduler lost track of a request and fails the call.
pub fn aggregate(
    results: Vec<TaskResult>,
    expected_length: usize,
) -> Result<BatchResult, ConsistencyError> {
    let mut slots: Vec<Option<Outcome>> = vec![None; expected_length];

    for TaskResult { index, outcome } in results {
        let slot = slots
            .get_mut(index)
            .ok_or(ConsistencyError::IndexOutOfRange {
                index,
                len: expected_length,
            })?;
        if slot.is_some() {
            return Err(ConsistencyError::DuplicateIndex(index));
        }
        *slot = Some(outcome);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(ConsistencyError::MissingIndex(index)))
        .collect()
}
