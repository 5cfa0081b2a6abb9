//! # Reactors and Processors
//!
//! The two stage contracts of a pipeline.
//!
//! - A [`Reactor`] consumes one event at a time. It is the terminal shape:
//!   validators, sinks and builders are reactors.
//! - A [`Processor`] additionally receives the *next* stage and decides what
//!   to forward: the event unchanged, a transformed or longer sequence, or
//!   nothing yet (buffering it for later replay).
//!
//! Both are synchronous. Every `process` call returns before the next event
//! is dispatched, and an error aborts the stream: the stage that raised it,
//! and everything downstream, must be discarded.

use crate::{error::ArborError, event::Event};

/// A consumer of one event at a time.
///
/// # Example
///
/// ```rust
/// use arbor_core::{ArborError, Event, EventKind, Reactor};
///
/// #[derive(Default)]
/// struct CountValues(usize);
///
/// impl Reactor for CountValues {
///     fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
///         if let EventKind::Value(_) = event.kind() {
///             self.0 += 1;
///         }
///         Ok(())
///     }
/// }
///
/// let mut counter = CountValues::default();
/// counter.process(&Event::value(1_i64)).unwrap();
/// assert_eq!(counter.0, 1);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Reactor`",
    label = "missing `Reactor` implementation",
    note = "Reactors must implement `process(&mut self, &Event<'_>)`."
)]
pub trait Reactor {
    /// Consumes one event.
    ///
    /// The event, and anything it borrows, is only valid for this call.
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError>;
}

impl<R: Reactor + ?Sized> Reactor for &mut R {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        (**self).process(event)
    }
}

impl<R: Reactor + ?Sized> Reactor for Box<R> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        (**self).process(event)
    }
}

/// A stage that forwards to an explicit next stage.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Processor`",
    label = "missing `Processor` implementation",
    note = "Processors must implement `process(&mut self, &Event<'_>, &mut dyn Reactor)`."
)]
pub trait Processor {
    /// Consumes one event, forwarding zero or more events to `next`.
    fn process(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError>;

    /// Whether this processor relies on a structural check running ahead of it.
    fn requires_structural_check(&self) -> bool {
        false
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError> {
        (**self).process(event, next)
    }

    fn requires_structural_check(&self) -> bool {
        (**self).requires_structural_check()
    }
}

/// A reactor that drops every event.
///
/// Terminates pipelines built without an explicit tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Reactor for Discard {
    fn process(&mut self, _event: &Event<'_>) -> Result<(), ArborError> {
        Ok(())
    }
}

/// A reactor backed by a closure. See [`reactor_fn`].
#[derive(Debug, Clone)]
pub struct FnReactor<F>(F);

impl<F> Reactor for FnReactor<F>
where
    F: FnMut(&Event<'_>) -> Result<(), ArborError>,
{
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        (self.0)(event)
    }
}

/// Wraps a closure as a [`Reactor`].
pub fn reactor_fn<F>(f: F) -> FnReactor<F>
where
    F: FnMut(&Event<'_>) -> Result<(), ArborError>,
{
    FnReactor(f)
}

/// Feeds a recorded event sequence into `reactor`, stopping at the first error.
pub fn replay<'e, 'a: 'e, I>(events: I, reactor: &mut dyn Reactor) -> Result<(), ArborError>
where
    I: IntoIterator<Item = &'e Event<'a>>,
{
    events.into_iter().try_for_each(|event| reactor.process(event))
}
