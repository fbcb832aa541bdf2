//! Render frames and session events

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{CardPhase, Direction, ReasonCode, RecordId};

/// Render parameters for one card at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFrame {
    pub record_id: RecordId,
    /// Stack depth (0 = top); `None` while the card is leaving
    pub depth: Option<usize>,
    pub phase: CardPhase,
    /// Horizontal offset from rest
    pub offset: f64,
    /// Degrees
    pub rotation: f64,
    pub opacity: f64,
    pub accept_opacity: f64,
    pub reject_opacity: f64,
    pub scale: f64,
    /// Downward offset
    pub lift: f64,
    pub z_index: usize,
    pub image_index: usize,
}

impl CardFrame {
    pub fn interactive(&self) -> bool {
        self.phase.accepts_input()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "card={} | phase={} | x={:.1} | rot={:.1} | opacity={:.2} | scale={:.2}",
            self.record_id, self.phase, self.offset, self.rotation, self.opacity, self.scale
        )
    }
}

/// Everything the session reports back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A card changed phase
    Transition {
        record_id: RecordId,
        from: CardPhase,
        to: CardPhase,
        reason: ReasonCode,
    },
    /// Input produced no decision
    Held {
        record_id: RecordId,
        reason: ReasonCode,
    },
    Decided {
        record_id: RecordId,
        direction: Direction,
        index: usize,
    },
    Undone {
        record_id: RecordId,
        direction: Direction,
    },
    Exhausted,
    Reset {
        total: usize,
    },
}

impl SessionEvent {
    pub fn reason(&self) -> ReasonCode {
        match self {
            SessionEvent::Transition { reason, .. } | SessionEvent::Held { reason, .. } => {
                *reason
            }
            SessionEvent::Decided { .. } => ReasonCode::S005_DECISION_EMITTED,
            SessionEvent::Undone { .. } => ReasonCode::S005_DECISION_UNDONE,
            SessionEvent::Exhausted => ReasonCode::S005_DECK_EXHAUSTED,
            SessionEvent::Reset { .. } => ReasonCode::S005_DECK_RESET,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        match self {
            SessionEvent::Transition {
                record_id,
                from,
                to,
                reason,
            } => format!(
                "  {} {} → {} | {}",
                record_id.to_string().bold(),
                from.paint(&from.to_string()),
                to.paint(&to.to_string()),
                reason.code().bright_black()
            ),
            SessionEvent::Held { record_id, reason } => format!(
                "  {} {} | {}",
                "⚠".yellow(),
                record_id,
                reason.description().yellow()
            ),
            SessionEvent::Decided {
                record_id,
                direction,
                index,
            } => {
                let label = match direction {
                    Direction::Accept => direction.label().green().bold(),
                    Direction::Reject => direction.label().red().bold(),
                };
                format!("{} {} (#{})", label, record_id.to_string().bold(), index + 1)
            }
            SessionEvent::Undone {
                record_id,
                direction,
            } => format!("{} {} ({})", "UNDO".magenta().bold(), record_id, direction),
            SessionEvent::Exhausted => "No more listings.".cyan().bold().to_string(),
            SessionEvent::Reset { total } => format!("{} {} records", "RESET".cyan(), total),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        match self {
            SessionEvent::Transition {
                record_id,
                from,
                to,
                reason,
            } => format!(
                "transition card={} from={} to={} reason={}",
                record_id,
                from,
                to,
                reason.code()
            ),
            SessionEvent::Held { record_id, reason } => {
                format!("held card={} reason={}", record_id, reason.code())
            }
            SessionEvent::Decided {
                record_id,
                direction,
                index,
            } => format!(
                "decided card={} direction={} index={}",
                record_id, direction, index
            ),
            SessionEvent::Undone {
                record_id,
                direction,
            } => format!("undone card={} direction={}", record_id, direction),
            SessionEvent::Exhausted => "exhausted".to_string(),
            SessionEvent::Reset { total } => format!("reset total={}", total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tag() {
        let event = SessionEvent::Decided {
            record_id: RecordId::new("a"),
            direction: Direction::Accept,
            index: 0,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "decided");
        assert_eq!(json["direction"], "accept");
    }

    #[test]
    fn test_parseable_decided() {
        let event = SessionEvent::Decided {
            record_id: RecordId::new("b"),
            direction: Direction::Reject,
            index: 1,
        };
        assert_eq!(
            event.to_parseable_string(),
            "decided card=b direction=REJECT index=1"
        );
        assert_eq!(event.reason(), ReasonCode::S005_DECISION_EMITTED);
    }
}
