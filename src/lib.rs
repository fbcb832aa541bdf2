//! swipedeck: card-stack swipe engine
//!
//! A deck of records is browsed one card at a time. The top card maps drag
//! motion (or a button trigger) to an accept/reject decision, plays a spring
//! settle-out, and the deck advances underneath it.
//!
//! Layers: `types` (plain data) → `core` (engines) → CLI / HTTP surface.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// GESTURE THRESHOLDS
// =============================================================================

/// Minimum |drag offset| at release that commits a decision
pub const COMMIT_THRESHOLD: f64 = 100.0;

/// Offset a decided card settles out to (also the full-scale render range)
pub const EXIT_DISTANCE: f64 = 200.0;

/// Rotation at ±EXIT_DISTANCE, in degrees
pub const MAX_ROTATION_DEG: f64 = 25.0;

/// Offset where opacity starts to fall off (fully opaque inside ±this)
pub const OPAQUE_BAND: f64 = 100.0;

/// Visual offset per unit of pointer travel.
///
/// 1.0 makes the card follow the pointer exactly, unlike framer's 0.2
/// rubber band. The commit test always uses raw pointer travel, so a lower
/// value only changes how far the card appears to move.
pub const DRAG_ELASTIC: f64 = 1.0;

// =============================================================================
// ANIMATION
// =============================================================================

/// Spring stiffness for settle, snap-back and stack promotion
pub const SPRING_STIFFNESS: f64 = 300.0;

/// Spring damping coefficient
pub const SPRING_DAMPING: f64 = 30.0;

/// Spring mass
pub const SPRING_MASS: f64 = 1.0;

/// Distance from target below which a spring may come to rest
pub const SPRING_REST_DELTA: f64 = 0.5;

/// Speed (units/s) below which a spring may come to rest
pub const SPRING_REST_SPEED: f64 = 10.0;

/// Largest integration step (milliseconds)
pub const SPRING_MAX_STEP_MS: f64 = 4.0;

/// Delay between a programmatic trigger starting its tween and the decision
pub const DECISION_DELAY_MS: u64 = 50;

/// Frame length used when running the clock to idle
pub const FRAME_MS: u64 = 16;

/// Upper bound on frames for `run_until_idle`
pub const MAX_IDLE_FRAMES: usize = 600;

// =============================================================================
// STACK LAYOUT
// =============================================================================

/// Cards rendered at once (top + receded filler)
pub const VISIBLE_DEPTH: usize = 3;

/// Scale of every card behind the top one
pub const BEHIND_SCALE: f64 = 0.95;

/// Downward offset of every card behind the top one
pub const BEHIND_LIFT: f64 = 8.0;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
