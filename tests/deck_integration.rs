//! Integration tests for the deck controller
//!
//! Drives `DeckController` directly, the way a host without animations would.

mod common;

use common::{records, Recorder};
use pretty_assertions::assert_eq;
use swipedeck::core::DeckController;
use swipedeck::error::DeckError;
use swipedeck::types::{Direction, RecordId};

fn deck(ids: &[&str]) -> DeckController<Recorder> {
    DeckController::new(records(ids), Recorder::default()).unwrap()
}

fn decide(deck: &mut DeckController<Recorder>, direction: Direction) {
    let id = deck.active().unwrap().id.clone();
    deck.request_decision(&id, direction).unwrap();
    deck.advance().unwrap();
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_decisions_follow_deck_order() {
    let ids = ["a", "b", "c", "d", "e"];
    let mut deck = deck(&ids);
    for (i, _) in ids.iter().enumerate() {
        let direction = if i % 2 == 0 {
            Direction::Accept
        } else {
            Direction::Reject
        };
        assert!(!deck.is_exhausted());
        decide(&mut deck, direction);
    }

    assert_eq!(deck.host().decided_ids(), ids.to_vec());
    assert!(deck.is_exhausted());
    assert_eq!(deck.host().decided.len(), deck.len());
    assert_eq!(deck.host().exhausted, 1);
}

#[test]
fn test_decision_indexes_match_positions() {
    let mut deck = deck(&["a", "b", "c"]);
    decide(&mut deck, Direction::Accept);
    decide(&mut deck, Direction::Reject);
    let indexes: Vec<usize> = deck.decisions().iter().map(|d| d.index).collect();
    assert_eq!(indexes, vec![0, 1]);
    assert_eq!(
        deck.decision_for(&RecordId::new("b")).unwrap().direction,
        Direction::Reject
    );
}

// =============================================================================
// PRECONDITIONS
// =============================================================================

#[test]
fn test_not_active_card_leaves_state_unchanged() {
    let mut deck = deck(&["A"]);
    let err = deck
        .request_decision(&RecordId::new("B"), Direction::Accept)
        .unwrap_err();

    assert_eq!(
        err,
        DeckError::NotActiveCard {
            requested: RecordId::new("B"),
            active: Some(RecordId::new("A")),
        }
    );
    assert_eq!(deck.cursor(), 0);
    assert!(deck.decisions().is_empty());
    assert!(deck.host().decided.is_empty());
    assert!(!deck.has_pending_advance());
}

#[test]
fn test_decided_card_cannot_be_decided_again() {
    let mut deck = deck(&["a", "b"]);
    decide(&mut deck, Direction::Accept);
    let err = deck
        .request_decision(&RecordId::new("a"), Direction::Reject)
        .unwrap_err();
    assert!(matches!(err, DeckError::NotActiveCard { .. }));
    assert_eq!(deck.host().decided.len(), 1);
}

#[test]
fn test_empty_deck_is_exhausted() {
    let mut deck = deck(&[]);
    assert!(deck.is_exhausted());
    assert!(deck.is_empty());
    assert_eq!(
        deck.request_decision(&RecordId::new("a"), Direction::Accept),
        Err(DeckError::OutOfRecords { cursor: 0, len: 0 })
    );
    assert_eq!(deck.host().exhausted, 0);
}

// =============================================================================
// UNDO / RESET
// =============================================================================

#[test]
fn test_undo_then_decide_again() {
    let mut deck = deck(&["A", "B"]);
    decide(&mut deck, Direction::Accept);

    let undone = deck.undo().unwrap();
    assert_eq!(undone.record_id, RecordId::new("A"));
    assert_eq!(deck.active().unwrap().id, RecordId::new("A"));
    assert!(deck.decision_for(&RecordId::new("A")).is_none());

    deck.request_decision(&RecordId::new("A"), Direction::Reject)
        .unwrap();
    assert_eq!(
        deck.host().decided,
        vec![
            ("A".to_string(), Direction::Accept),
            ("A".to_string(), Direction::Reject),
        ]
    );
    assert_eq!(deck.host().undone, vec![("A".to_string(), Direction::Accept)]);
}

#[test]
fn test_undo_walks_back_to_start() {
    let mut deck = deck(&["a", "b"]);
    decide(&mut deck, Direction::Accept);
    decide(&mut deck, Direction::Accept);
    deck.undo().unwrap();
    deck.undo().unwrap();
    assert_eq!(deck.cursor(), 0);
    assert_eq!(deck.undo(), Err(DeckError::NothingToUndo));
}

#[test]
fn test_reset_rejects_duplicates_and_keeps_old_deck() {
    let mut deck = deck(&["a", "b"]);
    decide(&mut deck, Direction::Accept);

    let err = deck.reset(records(&["x", "x"])).unwrap_err();
    assert_eq!(err, DeckError::DuplicateRecord(RecordId::new("x")));
    assert_eq!(deck.cursor(), 1);
    assert_eq!(deck.len(), 2);
}
