//! Card interaction unit: per-card state machine
//!
//! Phases:
//! - IDLE → INTERACTIVE: card reaches depth 0
//! - INTERACTIVE → EXITING: drag released past the commit threshold, or a
//!   programmatic trigger; either path must win the commit gate
//! - EXITING → DONE: settle animation comes to rest
//! - any → IDLE: card pushed off the top (undo, cursor jump); transient state cleared
//!
//! The unit never talks to the deck. It reports what happened and the session
//! decides when the decision is emitted.

use tracing::debug;

use crate::config::{EngineConfig, SpringConfig};
use crate::core::gate::CommitGate;
use crate::core::render::{stack_placement, RenderMap};
use crate::core::spring::Spring;
use crate::types::{CardFrame, CardPhase, Direction, ReasonCode, Record, RecordId};

/// A phase change with its cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTransition {
    pub from: CardPhase,
    pub to: CardPhase,
    pub reason: ReasonCode,
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Gate acquired; the caller must emit exactly this decision now
    Committed(Direction),
    /// Below threshold; springing back to rest
    SnapBack,
    /// Card not interactive or already committed
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CardUnit {
    record_id: RecordId,
    image_count: usize,
    phase: CardPhase,
    /// Stack depth; `None` once detached into the exiting slot
    depth: Option<usize>,
    offset: Spring,
    scale: Spring,
    lift: Spring,
    gate: CommitGate,
    /// Decision emitted, settle in flight
    pending: Option<Direction>,
    image_index: usize,
    dragging: bool,
    config: EngineConfig,
    render: RenderMap,
}

impl CardUnit {
    /// New unit resting at `depth`, phase IDLE. Call `set_depth` to promote.
    pub fn new(record: &Record, depth: usize, config: &EngineConfig) -> Self {
        let placement = stack_placement(depth, config);
        // scale lives in [0, 1], so its rest thresholds shrink accordingly
        let scale_spring = SpringConfig {
            rest_delta: config.spring.rest_delta / 100.0,
            rest_speed: config.spring.rest_speed / 100.0,
            ..config.spring
        };
        Self {
            record_id: record.id.clone(),
            image_count: record.image_count(),
            phase: CardPhase::Idle,
            depth: Some(depth),
            offset: Spring::new(0.0, config.spring),
            scale: Spring::new(placement.scale, scale_spring),
            lift: Spring::new(placement.lift, config.spring),
            gate: CommitGate::new(),
            pending: None,
            image_index: 0,
            dragging: false,
            config: config.clone(),
            render: RenderMap::from_config(config),
        }
    }

    // =========================================================================
    // STACK POSITION
    // =========================================================================

    /// Move to `depth`, animating scale/lift. Depth 0 promotes an IDLE card;
    /// any other depth recycles an INTERACTIVE one. Exiting cards only move.
    pub fn set_depth(&mut self, depth: usize) -> Option<CardTransition> {
        let placement = stack_placement(depth, &self.config);
        self.scale.set_target(placement.scale);
        self.lift.set_target(placement.lift);
        self.depth = Some(depth);

        match (self.phase, depth) {
            (CardPhase::Idle, 0) => {
                Some(self.enter(CardPhase::Interactive, ReasonCode::S004_CARD_PROMOTED))
            }
            (CardPhase::Interactive, d) if d > 0 => {
                self.clear_transient();
                Some(self.enter(CardPhase::Idle, ReasonCode::S004_CARD_RECYCLED))
            }
            (CardPhase::Idle, _) => {
                self.clear_transient();
                None
            }
            _ => None,
        }
    }

    /// Leave the stack (the exiting slot owns the unit until DONE)
    pub fn detach(&mut self) {
        self.depth = None;
    }

    /// Back to IDLE with all transient state cleared
    pub fn reset(&mut self) -> Option<CardTransition> {
        self.clear_transient();
        if self.phase == CardPhase::Idle {
            None
        } else {
            Some(self.enter(CardPhase::Idle, ReasonCode::S004_CARD_RECYCLED))
        }
    }

    fn clear_transient(&mut self) {
        self.offset.set_immediate(0.0);
        self.gate.rearm();
        self.pending = None;
        self.image_index = 0;
        self.dragging = false;
    }

    fn enter(&mut self, to: CardPhase, reason: ReasonCode) -> CardTransition {
        let from = self.phase;
        self.phase = to;
        debug!(card = %self.record_id, %from, %to, reason = reason.code(), "card transition");
        CardTransition { from, to, reason }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Follow the pointer. Returns false if the card ignores drag input.
    pub fn drag_move(&mut self, raw_offset: f64) -> bool {
        if !self.phase.accepts_input() || !raw_offset.is_finite() {
            return false;
        }
        self.dragging = true;
        self.offset.set_immediate(raw_offset * self.config.drag_elastic);
        true
    }

    /// Release the pointer at `raw_offset` (pointer travel, before elasticity)
    pub fn drag_end(&mut self, raw_offset: f64) -> DragOutcome {
        if !self.phase.accepts_input() {
            return DragOutcome::Ignored;
        }
        self.dragging = false;

        // a NaN/inf release never commits; the card springs home
        if raw_offset.is_finite() && raw_offset.abs() > self.config.commit_threshold {
            let direction = Direction::from_offset(raw_offset);
            if self.gate.try_acquire(direction) {
                self.start_exit(direction, ReasonCode::S001_DRAG_COMMITTED);
                return DragOutcome::Committed(direction);
            }
            return DragOutcome::Ignored;
        }

        self.offset.set_target(0.0);
        DragOutcome::SnapBack
    }

    /// Programmatic swipe. True if this call won the gate and started the tween.
    pub fn trigger(&mut self, direction: Direction) -> bool {
        if !self.phase.accepts_input() || !self.gate.try_acquire(direction) {
            debug!(card = %self.record_id, %direction, "trigger ignored");
            return false;
        }
        self.start_exit(direction, ReasonCode::S002_TRIGGER_ACCEPTED);
        true
    }

    fn start_exit(&mut self, direction: Direction, reason: ReasonCode) {
        self.dragging = false;
        self.pending = Some(direction);
        self.offset
            .set_target(direction.sign() * self.config.exit_distance);
        self.enter(CardPhase::Exiting, reason);
    }

    // =========================================================================
    // ANIMATION
    // =========================================================================

    /// Advance springs. Reports EXITING → DONE when the settle comes to rest.
    pub fn tick(&mut self, dt_ms: f64) -> Option<CardTransition> {
        self.scale.tick(dt_ms);
        self.lift.tick(dt_ms);
        if self.dragging {
            return None;
        }
        let rested = self.offset.tick(dt_ms);
        // released exactly at the exit offset: nothing left to animate
        let settled = rested || !self.offset.is_animating();
        if settled && self.phase == CardPhase::Exiting {
            self.pending = None;
            return Some(self.enter(CardPhase::Done, ReasonCode::S003_SETTLE_COMPLETE));
        }
        None
    }

    pub fn is_animating(&self) -> bool {
        (!self.dragging && self.offset.is_animating())
            || self.scale.is_animating()
            || self.lift.is_animating()
    }

    // =========================================================================
    // CAROUSEL
    // =========================================================================

    pub fn next_image(&mut self) -> usize {
        if self.image_count > 0 {
            self.image_index = (self.image_index + 1) % self.image_count;
        }
        self.image_index
    }

    pub fn prev_image(&mut self) -> usize {
        if self.image_count > 0 {
            self.image_index = (self.image_index + self.image_count - 1) % self.image_count;
        }
        self.image_index
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Rendered horizontal offset
    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn is_committed(&self) -> bool {
        self.gate.is_committed()
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// Render parameters for this instant
    pub fn frame(&self, z_index: usize) -> CardFrame {
        let x = self.offset.get();
        CardFrame {
            record_id: self.record_id.clone(),
            depth: self.depth,
            phase: self.phase,
            offset: x,
            rotation: self.render.rotation(x),
            opacity: self.render.opacity(x),
            accept_opacity: self.render.accept_opacity(x),
            reject_opacity: self.render.reject_opacity(x),
            scale: self.scale.get(),
            lift: self.lift.get(),
            z_index,
            image_index: self.image_index,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
