//! Core modules for the swipe deck

pub mod render;
pub mod spring;
pub mod gate;
pub mod card;
pub mod deck;
pub mod collection;
pub mod session;
pub mod api;

pub use render::{interpolate, stack_placement, RenderMap, StackPlacement};
pub use spring::Spring;
pub use gate::CommitGate;
pub use card::{CardTransition, CardUnit, DragOutcome};
pub use deck::{DeckController, DeckHost};
pub use collection::LikedCollection;
pub use session::{SessionStatus, SwipeSession};
pub use api::{create_router, run_server};
