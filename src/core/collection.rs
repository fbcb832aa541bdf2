//! Liked collection: the host-side list of accepted records

use serde::Serialize;
use tracing::debug;

use crate::core::deck::DeckHost;
use crate::types::{Direction, Record, RecordId};

/// Accepted records in decision order
#[derive(Debug, Clone, Default, Serialize)]
pub struct LikedCollection {
    records: Vec<Record>,
    exhausted: bool,
}

impl LikedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, record_id: &RecordId) -> bool {
        self.records.iter().any(|r| &r.id == record_id)
    }

    /// True once the deck reported it ran out
    pub fn saw_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Un-like a record. Returns it if it was present.
    pub fn remove(&mut self, record_id: &RecordId) -> Option<Record> {
        let pos = self.records.iter().position(|r| &r.id == record_id)?;
        Some(self.records.remove(pos))
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.exhausted = false;
    }
}

impl DeckHost for LikedCollection {
    fn on_decision(&mut self, record: &Record, direction: Direction) {
        if direction == Direction::Accept && !self.contains(&record.id) {
            debug!(card = %record.id, "liked");
            self.records.push(record.clone());
        }
    }

    fn on_exhausted(&mut self) {
        self.exhausted = true;
    }

    fn on_undo(&mut self, record: &Record, direction: Direction) {
        self.exhausted = false;
        if direction == Direction::Accept {
            self.remove(&record.id);
        }
    }
}
