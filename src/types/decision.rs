//! Accept/reject decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Swipe direction; right is accept, left is reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Accept,
    Reject,
}

impl Direction {
    /// Direction implied by a signed horizontal offset
    pub fn from_offset(offset: f64) -> Self {
        if offset > 0.0 {
            Direction::Accept
        } else {
            Direction::Reject
        }
    }

    /// +1 for accept (right), -1 for reject (left)
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Accept => 1.0,
            Direction::Reject => -1.0,
        }
    }

    /// Parse user-facing aliases ("like", "right", "y", "nope", "left", "n")
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "accept" | "like" | "right" | "y" | "yes" => Some(Direction::Accept),
            "reject" | "nope" | "left" | "n" | "no" => Some(Direction::Reject),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Accept => "LIKE",
            Direction::Reject => "NOPE",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Accept => "ACCEPT",
            Direction::Reject => "REJECT",
        };
        write!(f, "{}", name)
    }
}

/// A recorded decision for exactly one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub record_id: RecordId,
    pub direction: Direction,
    /// Deck position of the record
    pub index: usize,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    pub fn new(record_id: RecordId, direction: Direction, index: usize) -> Self {
        Self {
            record_id,
            direction,
            index,
            decided_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_offset() {
        assert_eq!(Direction::from_offset(150.0), Direction::Accept);
        assert_eq!(Direction::from_offset(-150.0), Direction::Reject);
        assert_eq!(Direction::from_offset(0.0), Direction::Reject);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Direction::parse("Like"), Some(Direction::Accept));
        assert_eq!(Direction::parse(" left "), Some(Direction::Reject));
        assert_eq!(Direction::parse("maybe"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Accept).unwrap();
        assert_eq!(json, "\"accept\"");
    }
}
