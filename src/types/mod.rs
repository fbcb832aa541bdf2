//! Core types for swipedeck

mod decision;
mod output;
mod phase;
mod reason;
mod record;

pub use decision::{Decision, Direction};
pub use output::{CardFrame, SessionEvent};
pub use phase::CardPhase;
pub use reason::ReasonCode;
pub use record::{Record, RecordId};
