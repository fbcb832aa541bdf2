//! One-shot commit latch
//!
//! Both decision paths (drag release and programmatic trigger) must acquire
//! the gate before emitting. Only the first acquisition succeeds until the
//! gate is re-armed by a card reset.

use crate::types::Direction;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGate {
    committed: Option<Direction>,
}

impl CommitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate for `direction`. False if it was already closed.
    pub fn try_acquire(&mut self, direction: Direction) -> bool {
        if self.committed.is_some() {
            return false;
        }
        self.committed = Some(direction);
        true
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Direction of the winning acquisition
    pub fn committed(&self) -> Option<Direction> {
        self.committed
    }

    pub fn rearm(&mut self) {
        self.committed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_acquire_wins() {
        let mut gate = CommitGate::new();
        assert!(gate.try_acquire(Direction::Accept));
        assert!(!gate.try_acquire(Direction::Reject));
        assert!(!gate.try_acquire(Direction::Accept));
        assert_eq!(gate.committed(), Some(Direction::Accept));
    }

    #[test]
    fn test_rearm() {
        let mut gate = CommitGate::new();
        gate.try_acquire(Direction::Reject);
        gate.rearm();
        assert!(!gate.is_committed());
        assert!(gate.try_acquire(Direction::Accept));
    }
}
