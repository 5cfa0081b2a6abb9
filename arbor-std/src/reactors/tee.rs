//! Fan-out to two reactors.

use arbor_core::{ArborError, Event, Reactor};

/// Forwards every event to `first`, then to `second`.
///
/// An error from `first` stops the event before it reaches `second`.
#[derive(Debug, Clone, Default)]
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Reactor, B: Reactor> Tee<A, B> {
    /// Pairs two reactors.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// The first reactor.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The second reactor.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Splits the pair.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Reactor, B: Reactor> Reactor for Tee<A, B> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        self.first.process(event)?;
        self.second.process(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingReactor, FailingReactor};

    #[test]
    fn test_tee_forwards_to_both() {
        let (a, b) = (CountingReactor::new(), CountingReactor::new());
        let mut tee = Tee::new(a.clone(), b.clone());
        tee.process(&Event::value(1_i64)).unwrap();
        assert_eq!((a.count(), b.count()), (1, 1));
    }

    #[test]
    fn test_tee_stops_on_first_error() {
        let b = CountingReactor::new();
        let mut tee = Tee::new(FailingReactor::on_event(0), b.clone());
        assert!(tee.process(&Event::value(1_i64)).is_err());
        assert_eq!(b.count(), 0);
    }
}
