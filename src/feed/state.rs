use super::query::FilterSignature;
use crate::catalog::BookRecord;
use std::collections::HashSet;

/// Accumulated results for the active signature.
///
/// Only [`FeedController`](super::FeedController) mutates this; everything
/// else gets read access.
#[derive(Debug, Default)]
pub struct FeedState {
    items: Vec<BookRecord>,
    ids: HashSet<String>,
    offset: usize,
    /// Sequence number of the outstanding fetch, if any.
    in_flight: Option<u64>,
    active: Option<FilterSignature>,
    exhausted: bool,
}

impl FeedState {
    pub fn items(&self) -> &[BookRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Starting index of the next page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn active_signature(&self) -> Option<&FilterSignature> {
        self.active.as_ref()
    }

    /// True once an empty page was seen for the active signature.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(super) fn in_flight_seq(&self) -> Option<u64> {
        self.in_flight
    }

    pub(super) fn set_in_flight(&mut self, seq: Option<u64>) {
        self.in_flight = seq;
    }

    pub(super) fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    pub(super) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Switch to `signature`, dropping everything from the previous one.
    pub(super) fn reset(&mut self, signature: FilterSignature) {
        self.items.clear();
        self.ids.clear();
        self.offset = 0;
        self.in_flight = None;
        self.exhausted = false;
        self.active = Some(signature);
    }

    /// Append records not already present, in received order.
    ///
    /// Returns `(added, duplicates)`.
    pub(super) fn append(&mut self, records: Vec<BookRecord>) -> (usize, usize) {
        let mut added = 0;
        let mut duplicates = 0;
        self.items.reserve(records.len());
        for record in records {
            if self.ids.insert(record.id.clone()) {
                self.items.push(record);
                added += 1;
            } else {
                duplicates += 1;
            }
        }
        (added, duplicates)
    }
}
