//! Swipe session: deck controller + live card units on a virtual clock
//!
//! Event order inside one `tick`:
//! 1. due deferred decisions fire (so a decision always precedes its card's DONE)
//! 2. every live spring steps
//! 3. exiting cards that reached DONE are torn down
//!
//! Only the top card and the one behind it hold live state. Deeper cards are
//! rendered from their depth alone.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::card::{CardTransition, CardUnit, DragOutcome};
use crate::core::deck::{DeckController, DeckHost};
use crate::core::render::stack_placement;
use crate::error::DeckError;
use crate::types::{
    CardFrame, CardPhase, Direction, ReasonCode, Record, RecordId, SessionEvent,
};

/// Cards that keep per-card state (top + one behind)
const LIVE_DEPTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledDecision {
    due_ms: u64,
    record_id: RecordId,
    direction: Direction,
}

/// Point-in-time summary for status displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub cursor: usize,
    pub total: usize,
    pub exhausted: bool,
    pub active: Option<RecordId>,
    pub decided: usize,
    pub decision_pending: bool,
    pub animating: bool,
    pub now_ms: u64,
}

#[derive(Debug)]
pub struct SwipeSession<H: DeckHost> {
    deck: DeckController<H>,
    config: EngineConfig,
    /// Live units, index == depth
    stack: Vec<CardUnit>,
    /// Decided cards still settling off-stage
    exiting: Vec<CardUnit>,
    timers: Vec<ScheduledDecision>,
    now_ms: u64,
}

impl<H: DeckHost> SwipeSession<H> {
    pub fn new(records: Vec<Record>, config: EngineConfig, host: H) -> Result<Self, DeckError> {
        let deck = DeckController::new(records, host)?;
        let mut session = Self {
            deck,
            config,
            stack: Vec::new(),
            exiting: Vec::new(),
            timers: Vec::new(),
            now_ms: 0,
        };
        let mut events = Vec::new();
        session.sync_stack(&mut events);
        Ok(session)
    }

    // =========================================================================
    // INBOUND COMMANDS
    // =========================================================================

    /// Start a new browsing session over `records`
    pub fn initialize_deck(&mut self, records: Vec<Record>) -> Result<Vec<SessionEvent>, DeckError> {
        self.reset(records)
    }

    /// Replace the deck; all decisions, timers and card state are dropped
    pub fn reset(&mut self, records: Vec<Record>) -> Result<Vec<SessionEvent>, DeckError> {
        self.deck.reset(records)?;
        self.timers.clear();
        self.exiting.clear();
        self.stack.clear();

        let mut events = vec![SessionEvent::Reset {
            total: self.deck.len(),
        }];
        self.sync_stack(&mut events);
        Ok(events)
    }

    /// Start over with the current records
    pub fn restart(&mut self) -> Result<Vec<SessionEvent>, DeckError> {
        let records = self.deck.records().to_vec();
        self.reset(records)
    }

    /// Button-style swipe on the top card.
    ///
    /// The card starts its exit tween now; the decision follows after
    /// `decision_delay_ms` (or immediately when the delay is 0). A repeat
    /// while the card is committed is reported as held, never decided twice.
    pub fn trigger_swipe(&mut self, direction: Direction) -> Result<Vec<SessionEvent>, DeckError> {
        let top = self.top_mut()?;
        let record_id = top.record_id().clone();
        let from = top.phase();
        let mut events = Vec::new();

        if !top.trigger(direction) {
            events.push(SessionEvent::Held {
                record_id,
                reason: ReasonCode::S002_TRIGGER_IGNORED,
            });
            return Ok(events);
        }
        events.push(SessionEvent::Transition {
            record_id: record_id.clone(),
            from,
            to: CardPhase::Exiting,
            reason: ReasonCode::S002_TRIGGER_ACCEPTED,
        });

        if self.config.decision_delay_ms == 0 {
            self.emit_decision(&record_id, direction, &mut events)?;
        } else {
            let due_ms = self.now_ms + self.config.decision_delay_ms;
            debug!(card = %record_id, %direction, due_ms, "decision scheduled");
            self.timers.push(ScheduledDecision {
                due_ms,
                record_id,
                direction,
            });
        }
        Ok(events)
    }

    /// Pointer moved to `raw_offset` from the drag origin
    pub fn drag_move(&mut self, raw_offset: f64) -> Result<Vec<SessionEvent>, DeckError> {
        let top = self.top_mut()?;
        if top.drag_move(raw_offset) {
            return Ok(Vec::new());
        }
        Ok(vec![SessionEvent::Held {
            record_id: top.record_id().clone(),
            reason: ReasonCode::S001_DRAG_IGNORED,
        }])
    }

    /// Pointer released at `raw_offset`; commits immediately past the threshold
    pub fn drag_end(&mut self, raw_offset: f64) -> Result<Vec<SessionEvent>, DeckError> {
        let top = self.top_mut()?;
        let record_id = top.record_id().clone();
        let from = top.phase();
        let mut events = Vec::new();

        match top.drag_end(raw_offset) {
            DragOutcome::Committed(direction) => {
                events.push(SessionEvent::Transition {
                    record_id: record_id.clone(),
                    from,
                    to: CardPhase::Exiting,
                    reason: ReasonCode::S001_DRAG_COMMITTED,
                });
                self.emit_decision(&record_id, direction, &mut events)?;
            }
            DragOutcome::SnapBack => events.push(SessionEvent::Held {
                record_id,
                reason: ReasonCode::S001_DRAG_BELOW_THRESHOLD,
            }),
            DragOutcome::Ignored => events.push(SessionEvent::Held {
                record_id,
                reason: ReasonCode::S001_DRAG_IGNORED,
            }),
        }
        Ok(events)
    }

    /// Rewind one decision. An in-flight trigger whose decision has not been
    /// emitted yet is cancelled and its card restored.
    pub fn undo(&mut self) -> Result<Vec<SessionEvent>, DeckError> {
        let decision = self.deck.undo()?;
        let mut events = Vec::new();

        self.timers.clear();
        for unit in self.stack.iter_mut() {
            if unit.phase() == CardPhase::Exiting {
                if let Some(t) = unit.reset() {
                    events.push(transition_event(unit.record_id(), t));
                }
            }
        }
        self.exiting.retain(|u| u.record_id() != &decision.record_id);

        events.push(SessionEvent::Undone {
            record_id: decision.record_id.clone(),
            direction: decision.direction,
        });
        self.sync_stack(&mut events);
        Ok(events)
    }

    pub fn next_image(&mut self) -> Result<usize, DeckError> {
        Ok(self.top_mut()?.next_image())
    }

    pub fn prev_image(&mut self) -> Result<usize, DeckError> {
        Ok(self.top_mut()?.prev_image())
    }

    // =========================================================================
    // CLOCK
    // =========================================================================

    /// Advance the virtual clock by `dt_ms`
    pub fn tick(&mut self, dt_ms: u64) -> Vec<SessionEvent> {
        self.now_ms += dt_ms;
        let mut events = Vec::new();
        self.fire_due_timers(&mut events);

        let dt = dt_ms as f64;
        let mut transitions = Vec::new();
        for unit in self.stack.iter_mut().chain(self.exiting.iter_mut()) {
            if let Some(t) = unit.tick(dt) {
                transitions.push((unit.record_id().clone(), t));
            }
        }
        for (record_id, t) in transitions {
            if t.to == CardPhase::Done {
                // settle outran the decision delay; the decision still goes first
                self.flush_timer(&record_id, &mut events);
            }
            events.push(transition_event(&record_id, t));
        }

        self.exiting.retain(|unit| {
            let done = unit.phase() == CardPhase::Done;
            if done {
                debug!(card = %unit.record_id(), "exiting card torn down");
            }
            !done
        });
        events
    }

    /// Tick in `frame_ms` steps until no timer is pending and nothing moves
    pub fn run_until_idle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for _ in 0..crate::MAX_IDLE_FRAMES {
            if !self.is_animating() {
                break;
            }
            events.extend(self.tick(self.config.frame_ms));
        }
        events
    }

    pub fn is_animating(&self) -> bool {
        !self.timers.is_empty()
            || self.stack.iter().any(CardUnit::is_animating)
            || !self.exiting.is_empty()
    }

    fn fire_due_timers(&mut self, events: &mut Vec<SessionEvent>) {
        let now = self.now_ms;
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.due_ms <= now);
        self.timers = later;

        for timer in due {
            if let Err(err) = self.emit_decision(&timer.record_id, timer.direction, events) {
                warn!(card = %timer.record_id, error = %err, "dropping stale decision");
                events.push(SessionEvent::Held {
                    record_id: timer.record_id,
                    reason: ReasonCode::S005_DECISION_STALE,
                });
            }
        }
    }

    fn flush_timer(&mut self, record_id: &RecordId, events: &mut Vec<SessionEvent>) {
        let Some(pos) = self.timers.iter().position(|t| &t.record_id == record_id) else {
            return;
        };
        let timer = self.timers.remove(pos);
        if let Err(err) = self.emit_decision(&timer.record_id, timer.direction, events) {
            warn!(card = %timer.record_id, error = %err, "dropping stale decision");
        }
    }

    // =========================================================================
    // DECK PLUMBING
    // =========================================================================

    /// Record the decision, move the card to the exiting slot, advance once
    fn emit_decision(
        &mut self,
        record_id: &RecordId,
        direction: Direction,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), DeckError> {
        let decision = self.deck.request_decision(record_id, direction)?;
        events.push(SessionEvent::Decided {
            record_id: decision.record_id,
            direction,
            index: decision.index,
        });

        if let Some(pos) = self.stack.iter().position(|u| u.record_id() == record_id) {
            let mut unit = self.stack.remove(pos);
            unit.detach();
            self.exiting.push(unit);
        }

        self.deck.advance()?;
        if self.deck.is_exhausted() {
            info!("no records left");
            events.push(SessionEvent::Exhausted);
        }
        self.sync_stack(events);
        Ok(())
    }

    /// Rebuild live units for the records at cursor..cursor+LIVE_DEPTH,
    /// reusing units that are still in range
    fn sync_stack(&mut self, events: &mut Vec<SessionEvent>) {
        let mut previous = std::mem::take(&mut self.stack);
        let cursor = self.deck.cursor();

        for depth in 0..LIVE_DEPTH {
            let Some(record) = self.deck.record_at(cursor + depth) else {
                break;
            };
            let mut unit = match previous.iter().position(|u| u.record_id() == &record.id) {
                Some(pos) => previous.remove(pos),
                None => {
                    self.exiting.retain(|u| u.record_id() != &record.id);
                    CardUnit::new(record, depth, &self.config)
                }
            };
            if let Some(t) = unit.set_depth(depth) {
                events.push(transition_event(unit.record_id(), t));
            }
            self.stack.push(unit);
        }

        for unit in previous {
            debug!(card = %unit.record_id(), "live unit dropped");
        }
    }

    fn top_mut(&mut self) -> Result<&mut CardUnit, DeckError> {
        let err = DeckError::OutOfRecords {
            cursor: self.deck.cursor(),
            len: self.deck.len(),
        };
        if self.deck.is_exhausted() {
            return Err(err);
        }
        self.stack.first_mut().ok_or(err)
    }

    // =========================================================================
    // RENDER & ACCESSORS
    // =========================================================================

    /// Frames for everything on screen, topmost first
    pub fn frames(&self) -> Vec<CardFrame> {
        let cursor = self.deck.cursor();
        let visible = (self.deck.len() - cursor).min(self.config.visible_depth);
        let mut frames = Vec::with_capacity(visible + self.exiting.len());

        for (i, unit) in self.exiting.iter().enumerate().rev() {
            frames.push(unit.frame(visible + 1 + i));
        }
        for depth in 0..visible {
            let z_index = visible - depth;
            if let Some(unit) = self.stack.get(depth) {
                frames.push(unit.frame(z_index));
            } else if let Some(record) = self.deck.record_at(cursor + depth) {
                frames.push(self.static_frame(record, depth, z_index));
            }
        }
        frames
    }

    fn static_frame(&self, record: &Record, depth: usize, z_index: usize) -> CardFrame {
        let placement = stack_placement(depth, &self.config);
        CardFrame {
            record_id: record.id.clone(),
            depth: Some(depth),
            phase: CardPhase::Idle,
            offset: 0.0,
            rotation: 0.0,
            opacity: 1.0,
            accept_opacity: 0.0,
            reject_opacity: 0.0,
            scale: placement.scale,
            lift: placement.lift,
            z_index,
            image_index: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            cursor: self.deck.cursor(),
            total: self.deck.len(),
            exhausted: self.deck.is_exhausted(),
            active: self.deck.active().map(|r| r.id.clone()),
            decided: self.deck.decisions().len(),
            decision_pending: !self.timers.is_empty(),
            animating: self.is_animating(),
            now_ms: self.now_ms,
        }
    }

    pub fn deck(&self) -> &DeckController<H> {
        &self.deck
    }

    pub fn host(&self) -> &H {
        self.deck.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.deck.host_mut()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_exhausted(&self) -> bool {
        self.deck.is_exhausted()
    }

    pub fn cursor(&self) -> usize {
        self.deck.cursor()
    }

    pub fn active_record(&self) -> Option<&Record> {
        self.deck.active()
    }

    /// Live unit at the top of the stack
    pub fn top(&self) -> Option<&CardUnit> {
        self.stack.first()
    }

    pub fn exiting(&self) -> &[CardUnit] {
        &self.exiting
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

fn transition_event(record_id: &RecordId, t: CardTransition) -> SessionEvent {
    SessionEvent::Transition {
        record_id: record_id.clone(),
        from: t.from,
        to: t.to,
        reason: t.reason,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collection::LikedCollection;

    fn session(ids: &[&str]) -> SwipeSession<LikedCollection> {
        let records = ids.iter().map(|id| Record::new(*id, *id)).collect();
        SwipeSession::new(records, EngineConfig::default(), LikedCollection::new()).unwrap()
    }

    fn decided(events: &[SessionEvent]) -> Vec<(String, Direction)> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Decided {
                    record_id,
                    direction,
                    ..
                } => Some((record_id.to_string(), *direction)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_top_is_interactive() {
        let session = session(&["a", "b", "c"]);
        let top = session.top().unwrap();
        assert_eq!(top.record_id(), &RecordId::new("a"));
        assert_eq!(top.phase(), CardPhase::Interactive);
        assert!(!session.is_animating());
    }

    #[test]
    fn test_trigger_defers_decision() {
        let mut session = session(&["a", "b"]);
        let events = session.trigger_swipe(Direction::Accept).unwrap();
        assert!(decided(&events).is_empty());
        assert_eq!(session.cursor(), 0);

        assert!(decided(&session.tick(49)).is_empty());
        let events = session.tick(1);
        assert_eq!(decided(&events), vec![("a".to_string(), Direction::Accept)]);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.exiting().len(), 1);
    }

    #[test]
    fn test_zero_delay_is_synchronous() {
        let records = vec![Record::new("a", "A")];
        let config = EngineConfig {
            decision_delay_ms: 0,
            ..EngineConfig::default()
        };
        let mut session = SwipeSession::new(records, config, LikedCollection::new()).unwrap();
        let events = session.trigger_swipe(Direction::Reject).unwrap();
        assert_eq!(decided(&events), vec![("a".to_string(), Direction::Reject)]);
        assert!(events.contains(&SessionEvent::Exhausted));
    }

    #[test]
    fn test_repeat_trigger_during_delay_is_held() {
        let mut session = session(&["a", "b"]);
        session.trigger_swipe(Direction::Accept).unwrap();
        let events = session.trigger_swipe(Direction::Reject).unwrap();
        assert_eq!(
            events,
            vec![SessionEvent::Held {
                record_id: RecordId::new("a"),
                reason: ReasonCode::S002_TRIGGER_IGNORED,
            }]
        );
        let events = session.run_until_idle();
        assert_eq!(decided(&events), vec![("a".to_string(), Direction::Accept)]);
    }

    #[test]
    fn test_drag_commit_is_immediate() {
        let mut session = session(&["a", "b"]);
        session.drag_move(140.0).unwrap();
        let events = session.drag_end(140.0).unwrap();
        assert_eq!(decided(&events), vec![("a".to_string(), Direction::Accept)]);
        assert_eq!(session.top().unwrap().record_id(), &RecordId::new("b"));
        assert_eq!(session.top().unwrap().phase(), CardPhase::Interactive);
        assert_eq!(session.host().len(), 1);
    }

    #[test]
    fn test_exit_settles_and_is_torn_down() {
        let mut session = session(&["a", "b"]);
        session.drag_end(-150.0).unwrap();
        let events = session.run_until_idle();
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::Transition {
                to: CardPhase::Done,
                ..
            }
        )));
        assert!(session.exiting().is_empty());
        assert!(!session.is_animating());
    }

    #[test]
    fn test_undo_cancels_inflight_trigger() {
        let mut session = session(&["a", "b"]);
        session.drag_end(150.0).unwrap();
        session.trigger_swipe(Direction::Reject).unwrap();

        let events = session.undo().unwrap();
        assert!(events.contains(&SessionEvent::Undone {
            record_id: RecordId::new("a"),
            direction: Direction::Accept,
        }));
        assert!(!session.status().decision_pending);

        let events = session.run_until_idle();
        assert!(decided(&events).is_empty());
        assert_eq!(session.top().unwrap().record_id(), &RecordId::new("a"));
        assert!(session.host().is_empty());
    }

    #[test]
    fn test_frames_order_and_depth() {
        let mut session = session(&["a", "b", "c", "d"]);
        let frames = session.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].depth, Some(0));
        assert_eq!(frames[0].z_index, 3);
        assert_eq!(frames[2].record_id, RecordId::new("c"));
        assert_eq!(frames[2].scale, 0.95);

        session.drag_end(150.0).unwrap();
        let frames = session.frames();
        assert_eq!(frames[0].record_id, RecordId::new("a"));
        assert_eq!(frames[0].depth, None);
        assert!(frames[0].z_index > frames[1].z_index);
    }

    #[test]
    fn test_long_delay_still_decides_before_done() {
        let records = vec![Record::new("a", "A"), Record::new("b", "B")];
        let config = EngineConfig {
            decision_delay_ms: 5_000,
            ..EngineConfig::default()
        };
        let mut session = SwipeSession::new(records, config, LikedCollection::new()).unwrap();
        session.trigger_swipe(Direction::Accept).unwrap();

        let events = session.run_until_idle();
        let decided = events
            .iter()
            .position(|e| matches!(e, SessionEvent::Decided { .. }))
            .unwrap();
        let done = events
            .iter()
            .position(|e| matches!(e, SessionEvent::Transition { to: CardPhase::Done, .. }))
            .unwrap();
        assert!(decided < done);
        assert!(session.now_ms() < 5_000);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_empty_deck() {
        let mut session = session(&[]);
        assert!(session.is_exhausted());
        assert!(matches!(
            session.trigger_swipe(Direction::Accept),
            Err(DeckError::OutOfRecords { .. })
        ));
        assert!(session.frames().is_empty());
    }
}
