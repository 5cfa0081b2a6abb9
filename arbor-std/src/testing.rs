//! Testing utilities for Arbor.
//!
//! This module provides reactors that make it easy to assert on what a
//! pipeline forwards.
//!
//! # Features
//!
//! - [`RecordingReactor`]: Records a snapshot of every event it receives
//! - [`CountingReactor`]: Counts events without retaining them
//! - [`FailingReactor`]: Fails on a chosen event, for error-path tests

use arbor_core::{ArborError, Event, EventKind, ObjectPath, Reactor};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Reactor
// ============================================================================

/// A reactor that records snapshots of all events it receives.
///
/// Clones share the same log, so a clone can be handed to a pipeline while
/// the test keeps the original for inspection.
///
/// # Example
///
/// ```rust
/// use arbor_std::testing::RecordingReactor;
/// use arbor_core::{Event, Reactor};
///
/// let recorder = RecordingReactor::new();
/// let mut sink = recorder.clone();
/// sink.process(&Event::value(1_i64)).unwrap();
/// assert_eq!(recorder.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingReactor {
    events: Arc<Mutex<Vec<Event<'static>>>>,
}

impl RecordingReactor {
    /// Create a new, empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded events.
    pub fn events(&self) -> Vec<Event<'static>> {
        self.events.lock().unwrap().clone()
    }

    /// The payloads of the recorded events.
    pub fn kinds(&self) -> Vec<EventKind<'static>> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.kind().clone())
            .collect()
    }

    /// The rendered paths of the recorded events, empty where untagged.
    pub fn paths(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.path().map(ObjectPath::to_string).unwrap_or_default())
            .collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Reactor for RecordingReactor {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        self.events.lock().unwrap().push(event.snapshot());
        Ok(())
    }
}

// ============================================================================
// Counting Reactor
// ============================================================================

/// A reactor that only counts events.
#[derive(Clone, Default)]
pub struct CountingReactor {
    count: Arc<AtomicUsize>,
}

impl CountingReactor {
    /// Create a new counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Reactor for CountingReactor {
    fn process(&mut self, _event: &Event<'_>) -> Result<(), ArborError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Reactor
// ============================================================================

/// A reactor that accepts `n` events and fails on the next one.
#[derive(Clone, Debug)]
pub struct FailingReactor {
    remaining: usize,
    message: &'static str,
}

impl FailingReactor {
    /// Fails on the event with zero-based index `n`.
    pub fn on_event(n: usize) -> Self {
        Self {
            remaining: n,
            message: "injected failure",
        }
    }

    /// Uses `message` for the injected error.
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }
}

impl Reactor for FailingReactor {
    fn process(&mut self, _event: &Event<'_>) -> Result<(), ArborError> {
        match self.remaining.checked_sub(1) {
            Some(rest) => {
                self.remaining = rest;
                Ok(())
            }
            None => Err(ArborError::Builder(self.message.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reactor_shares_log() {
        let recorder = RecordingReactor::new();
        let mut sink = recorder.clone();
        sink.process(&Event::map_start().with_path(ObjectPath::root()))
            .unwrap();
        sink.process(&Event::end()).unwrap();
        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.paths(), vec!["$".to_string(), String::new()]);
        recorder.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_failing_reactor() {
        let mut failing = FailingReactor::on_event(1).with_message("boom");
        failing.process(&Event::map_start()).unwrap();
        let err = failing.process(&Event::end()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
