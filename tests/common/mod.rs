//! Shared fixtures for integration tests

#![allow(dead_code)]

use swipedeck::config::EngineConfig;
use swipedeck::core::{DeckHost, SwipeSession};
use swipedeck::types::{Direction, Record};

/// Host that records every callback in order
#[derive(Debug, Default)]
pub struct Recorder {
    pub decided: Vec<(String, Direction)>,
    pub undone: Vec<(String, Direction)>,
    pub exhausted: usize,
}

impl Recorder {
    pub fn decided_ids(&self) -> Vec<String> {
        self.decided.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl DeckHost for Recorder {
    fn on_decision(&mut self, record: &Record, direction: Direction) {
        self.decided.push((record.id.to_string(), direction));
    }

    fn on_exhausted(&mut self) {
        self.exhausted += 1;
    }

    fn on_undo(&mut self, record: &Record, direction: Direction) {
        self.undone.push((record.id.to_string(), direction));
    }
}

pub fn records(ids: &[&str]) -> Vec<Record> {
    ids.iter()
        .map(|id| Record::new(*id, format!("Listing {}", id)))
        .collect()
}

pub fn session(ids: &[&str]) -> SwipeSession<Recorder> {
    SwipeSession::new(records(ids), EngineConfig::default(), Recorder::default())
        .expect("valid deck")
}

pub fn session_with(ids: &[&str], config: EngineConfig) -> SwipeSession<Recorder> {
    SwipeSession::new(records(ids), config, Recorder::default()).expect("valid deck")
}
