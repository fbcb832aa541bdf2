//! Deck controller: ordered records, cursor, decisions
//!
//! Invariants:
//! - records[..cursor] are decided, records[cursor] is the active card
//! - decisions.len() == cursor, plus one while an advance is pending
//! - a record is passed to `DeckHost::on_decision` at most once per session,
//!   unless its decision is undone first

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::DeckError;
use crate::types::{Decision, Direction, Record, RecordId};

/// Host collaborator notified of deck outcomes
pub trait DeckHost {
    /// A record was decided. Called once per record, in deck order.
    fn on_decision(&mut self, record: &Record, direction: Direction);

    /// The last record was decided
    fn on_exhausted(&mut self) {}

    /// A decision was discarded by undo
    fn on_undo(&mut self, _record: &Record, _direction: Direction) {}
}

#[derive(Debug)]
pub struct DeckController<H: DeckHost> {
    records: Vec<Record>,
    cursor: usize,
    decisions: Vec<Decision>,
    /// Decision recorded for records[cursor], advance not yet run
    pending_advance: bool,
    exhausted_notified: bool,
    host: H,
}

impl<H: DeckHost> DeckController<H> {
    pub fn new(records: Vec<Record>, host: H) -> Result<Self, DeckError> {
        check_unique(&records)?;
        Ok(Self {
            records,
            cursor: 0,
            decisions: Vec::new(),
            pending_advance: false,
            exhausted_notified: false,
            host,
        })
    }

    /// Record a decision for the active card and notify the host.
    ///
    /// The cursor does not move; `advance` must run afterwards.
    pub fn request_decision(
        &mut self,
        record_id: &RecordId,
        direction: Direction,
    ) -> Result<Decision, DeckError> {
        let Some(active) = self.records.get(self.cursor) else {
            return Err(self.out_of_records());
        };

        if self.pending_advance || &active.id != record_id {
            return Err(DeckError::NotActiveCard {
                requested: record_id.clone(),
                active: Some(active.id.clone()),
            });
        }

        let decision = Decision::new(record_id.clone(), direction, self.cursor);
        self.decisions.push(decision.clone());
        self.pending_advance = true;

        info!(card = %record_id, %direction, index = self.cursor, "decision");
        self.host.on_decision(active, direction);
        Ok(decision)
    }

    /// Move past the decided active card. Returns the new cursor.
    ///
    /// No-op if the active card has no decision yet.
    pub fn advance(&mut self) -> Result<usize, DeckError> {
        if self.cursor >= self.records.len() {
            return Err(self.out_of_records());
        }
        if !self.pending_advance {
            debug!(cursor = self.cursor, "advance without decision, ignored");
            return Ok(self.cursor);
        }

        self.cursor += 1;
        self.pending_advance = false;

        if self.is_exhausted() && !self.exhausted_notified {
            self.exhausted_notified = true;
            info!(total = self.records.len(), "deck exhausted");
            self.host.on_exhausted();
        }
        Ok(self.cursor)
    }

    /// Discard the most recent decision and make its record active again
    pub fn undo(&mut self) -> Result<Decision, DeckError> {
        if !self.pending_advance {
            if self.cursor == 0 {
                return Err(DeckError::NothingToUndo);
            }
            self.cursor -= 1;
        }
        self.pending_advance = false;

        let Some(decision) = self.decisions.pop() else {
            return Err(DeckError::NothingToUndo);
        };
        self.exhausted_notified = false;

        info!(card = %decision.record_id, direction = %decision.direction, "undo");
        if let Some(record) = self.records.get(self.cursor) {
            self.host.on_undo(record, decision.direction);
        }
        Ok(decision)
    }

    /// Replace the deck and start over
    pub fn reset(&mut self, records: Vec<Record>) -> Result<(), DeckError> {
        check_unique(&records)?;
        info!(total = records.len(), "deck reset");
        self.records = records;
        self.cursor = 0;
        self.decisions.clear();
        self.pending_advance = false;
        self.exhausted_notified = false;
        Ok(())
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.records.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_at(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Active (top) record, if any
    pub fn active(&self) -> Option<&Record> {
        self.records.get(self.cursor)
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn decision_for(&self, record_id: &RecordId) -> Option<&Decision> {
        self.decisions.iter().find(|d| &d.record_id == record_id)
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn out_of_records(&self) -> DeckError {
        DeckError::OutOfRecords {
            cursor: self.cursor,
            len: self.records.len(),
        }
    }
}

fn check_unique(records: &[Record]) -> Result<(), DeckError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(&record.id) {
            return Err(DeckError::DuplicateRecord(record.id.clone()));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
