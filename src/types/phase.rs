//! Card lifecycle phases

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

/// The four phases of a card interaction unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardPhase {
    /// Behind the top card, no interaction
    Idle,
    /// Top card, accepts drag and trigger input
    Interactive,
    /// Decision emitted, settle animation in flight
    Exiting,
    /// Settle finished; unit can be torn down
    Done,
}

impl CardPhase {
    /// Paint a string in this phase's terminal colour
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            CardPhase::Idle => text.bright_black(),
            CardPhase::Interactive => text.cyan(),
            CardPhase::Exiting => text.yellow(),
            CardPhase::Done => text.green(),
        }
    }

    pub fn accepts_input(&self) -> bool {
        *self == CardPhase::Interactive
    }
}

impl std::fmt::Display for CardPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardPhase::Idle => "IDLE",
            CardPhase::Interactive => "INTERACTIVE",
            CardPhase::Exiting => "EXITING",
            CardPhase::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}
