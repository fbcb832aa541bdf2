//! Reason codes for card and deck transitions

use serde::{Deserialize, Serialize};

/// Reason codes attached to every transition and event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // S001: Drag
    // =========================================================================
    /// Released beyond the commit threshold
    S001_DRAG_COMMITTED,
    /// Released inside the threshold, card springs back
    S001_DRAG_BELOW_THRESHOLD,
    /// Drag input on a card that is not interactive
    S001_DRAG_IGNORED,

    // =========================================================================
    // S002: Programmatic trigger
    // =========================================================================
    /// Trigger acquired the commit gate, tween started
    S002_TRIGGER_ACCEPTED,
    /// Trigger refused, card already committed
    S002_TRIGGER_IGNORED,

    // =========================================================================
    // S003: Settle
    // =========================================================================
    /// Exit animation finished, card is done
    S003_SETTLE_COMPLETE,

    // =========================================================================
    // S004: Stack
    // =========================================================================
    /// Card became the top of the stack
    S004_CARD_PROMOTED,
    /// Card left the top position and was cleared
    S004_CARD_RECYCLED,

    // =========================================================================
    // S005: Deck
    // =========================================================================
    /// Decision recorded and sent to the host
    S005_DECISION_EMITTED,
    /// Deferred decision no longer matches the active card
    S005_DECISION_STALE,
    /// Last record decided
    S005_DECK_EXHAUSTED,
    /// Last decision discarded
    S005_DECISION_UNDONE,
    /// Deck replaced
    S005_DECK_RESET,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::S001_DRAG_COMMITTED => "S001_DRAG_COMMITTED",
            Self::S001_DRAG_BELOW_THRESHOLD => "S001_DRAG_BELOW_THRESHOLD",
            Self::S001_DRAG_IGNORED => "S001_DRAG_IGNORED",
            Self::S002_TRIGGER_ACCEPTED => "S002_TRIGGER_ACCEPTED",
            Self::S002_TRIGGER_IGNORED => "S002_TRIGGER_IGNORED",
            Self::S003_SETTLE_COMPLETE => "S003_SETTLE_COMPLETE",
            Self::S004_CARD_PROMOTED => "S004_CARD_PROMOTED",
            Self::S004_CARD_RECYCLED => "S004_CARD_RECYCLED",
            Self::S005_DECISION_EMITTED => "S005_DECISION_EMITTED",
            Self::S005_DECISION_STALE => "S005_DECISION_STALE",
            Self::S005_DECK_EXHAUSTED => "S005_DECK_EXHAUSTED",
            Self::S005_DECISION_UNDONE => "S005_DECISION_UNDONE",
            Self::S005_DECK_RESET => "S005_DECK_RESET",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::S001_DRAG_COMMITTED => "Drag passed commit threshold",
            Self::S001_DRAG_BELOW_THRESHOLD => "Drag released below threshold",
            Self::S001_DRAG_IGNORED => "Card not interactive",
            Self::S002_TRIGGER_ACCEPTED => "Swipe triggered",
            Self::S002_TRIGGER_IGNORED => "Card already committed",
            Self::S003_SETTLE_COMPLETE => "Card settled off-stage",
            Self::S004_CARD_PROMOTED => "Card is now on top",
            Self::S004_CARD_RECYCLED => "Card state cleared",
            Self::S005_DECISION_EMITTED => "Decision recorded",
            Self::S005_DECISION_STALE => "Stale decision dropped",
            Self::S005_DECK_EXHAUSTED => "No records left",
            Self::S005_DECISION_UNDONE => "Decision undone",
            Self::S005_DECK_RESET => "Deck reset",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
