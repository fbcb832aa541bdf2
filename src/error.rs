//! Error types

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RecordId;

/// Precondition violations on the deck
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// Cursor is already past the last record
    #[error("out of records: cursor {cursor} of {len}")]
    OutOfRecords { cursor: usize, len: usize },

    /// Decision requested for a record that is not the active card
    #[error("record '{requested}' is not the active card (active: {})", display_active(.active))]
    NotActiveCard {
        requested: RecordId,
        active: Option<RecordId>,
    },

    /// Undo with the cursor at 0
    #[error("nothing to undo")]
    NothingToUndo,

    /// Deck built with the same id twice
    #[error("duplicate record id '{0}' in deck")]
    DuplicateRecord(RecordId),
}

fn display_active(active: &Option<RecordId>) -> String {
    match active {
        Some(id) => id.to_string(),
        None => "none".to_string(),
    }
}

/// Failure loading a config or deck file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_active_message() {
        let err = DeckError::NotActiveCard {
            requested: RecordId::new("b"),
            active: Some(RecordId::new("a")),
        };
        assert_eq!(err.to_string(), "record 'b' is not the active card (active: a)");

        let err = DeckError::NotActiveCard {
            requested: RecordId::new("b"),
            active: None,
        };
        assert!(err.to_string().ends_with("(active: none)"));
    }
}
