//! # Building Values
//!
//! [`BuildReactor`] drives the [`Factory`] protocol from a well-formed event
//! stream and hands out the finished value once the top-level value closes.
//!
//! It keeps an explicit stack of open builders, so nesting depth is bounded
//! only by memory. Each builder call receives the path of the event that
//! triggered it, or the root path when the stream carries none.

use arbor_core::{
    ArborError, BuildError, Event, EventKind, EventTag, Factory, FieldSetBuilder, ListBuilder,
    ObjectPath, Reactor,
};

enum Frame<T> {
    /// The factory for the next value at this position.
    Factory(Box<dyn Factory<T>>),
    /// An open field whose value is still being built.
    Field(String),
    FieldSet(Box<dyn FieldSetBuilder<T>>),
    List(Box<dyn ListBuilder<T>>),
}

enum Slot<T> {
    Building,
    Ready(T),
    Taken,
}

/// Materializes the value carried by an event stream.
///
/// # Example
///
/// ```rust,ignore
/// let mut build = BuildReactor::new(TreeFactory);
/// replay(events.iter(), &mut build)?;
/// let tree = build.take_result()?;
/// ```
pub struct BuildReactor<T> {
    root: Box<dyn Factory<T>>,
    stack: Vec<Frame<T>>,
    slot: Slot<T>,
}

impl<T> BuildReactor<T> {
    /// A reactor that builds the top-level value with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Factory<T> + 'static,
    {
        Self::from_boxed(Box::new(factory))
    }

    /// Like [`new`](Self::new) for an already boxed factory.
    pub fn from_boxed(root: Box<dyn Factory<T>>) -> Self {
        Self {
            root,
            stack: Vec::new(),
            slot: Slot::Building,
        }
    }

    /// Whether the top-level value has been produced.
    pub fn is_complete(&self) -> bool {
        !matches!(self.slot, Slot::Building)
    }

    /// Takes the built value. Succeeds exactly once.
    pub fn take_result(&mut self) -> Result<T, BuildError> {
        match std::mem::replace(&mut self.slot, Slot::Taken) {
            Slot::Ready(value) => Ok(value),
            Slot::Building => {
                self.slot = Slot::Building;
                Err(BuildError::NotComplete)
            }
            Slot::Taken => Err(BuildError::AlreadyTaken),
        }
    }

    /// Runs `f` with the factory responsible for the next value.
    fn with_factory<R>(
        &mut self,
        event: &Event<'_>,
        path: &ObjectPath,
        f: impl FnOnce(&mut dyn Factory<T>) -> Result<R, ArborError>,
    ) -> Result<R, ArborError> {
        match self.stack.pop() {
            None => f(self.root.as_mut()),
            Some(Frame::Factory(mut factory)) => f(factory.as_mut()),
            Some(Frame::List(mut list)) => {
                let factory = list.next_factory(path);
                self.stack.push(Frame::List(list));
                f(factory?.as_mut())
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(BuildError::UnexpectedEvent { event: event.tag() }.into())
            }
        }
    }

    /// Hands a completed value to whatever is waiting for it.
    fn route(&mut self, path: &ObjectPath, value: T) -> Result<(), ArborError> {
        match self.stack.pop() {
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%path, "top-level value built");
                self.slot = Slot::Ready(value);
                Ok(())
            }
            Some(Frame::Field(name)) => match self.stack.last_mut() {
                Some(Frame::FieldSet(fields)) => Ok(fields.set_value(path, &name, value)?),
                _ => Err(BuildError::UnexpectedEvent {
                    event: EventTag::End,
                }
                .into()),
            },
            Some(Frame::List(mut list)) => {
                let added = list.add_value(path, value);
                self.stack.push(Frame::List(list));
                Ok(added?)
            }
            Some(frame) => {
                self.stack.push(frame);
                Err(BuildError::UnexpectedEvent {
                    event: EventTag::End,
                }
                .into())
            }
        }
    }
}

impl<T> Reactor for BuildReactor<T> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        if self.is_complete() {
            return Err(BuildError::AlreadyComplete { event: event.tag() }.into());
        }
        let path = event.path().cloned().unwrap_or_default();
        match event.kind() {
            EventKind::Value(scalar) => {
                let value =
                    self.with_factory(event, &path, |f| Ok(f.build_value(&path, scalar)?))?;
                self.route(&path, value)
            }
            EventKind::ListStart(element) => {
                let list =
                    self.with_factory(event, &path, |f| Ok(f.start_list(&path, element)?))?;
                self.stack.push(Frame::List(list));
                Ok(())
            }
            EventKind::MapStart => {
                let fields = self.with_factory(event, &path, |f| Ok(f.start_map(&path)?))?;
                self.stack.push(Frame::FieldSet(fields));
                Ok(())
            }
            EventKind::StructStart(type_name) => {
                let fields =
                    self.with_factory(event, &path, |f| Ok(f.start_struct(&path, type_name)?))?;
                self.stack.push(Frame::FieldSet(fields));
                Ok(())
            }
            EventKind::FieldStart(name) => match self.stack.last_mut() {
                Some(Frame::FieldSet(fields)) => {
                    let factory = fields.start_field(&path, name)?;
                    self.stack.push(Frame::Field(name.to_string()));
                    self.stack.push(Frame::Factory(factory));
                    Ok(())
                }
                _ => Err(BuildError::UnexpectedEvent { event: event.tag() }.into()),
            },
            EventKind::End => match self.stack.pop() {
                Some(Frame::FieldSet(fields)) => {
                    let value = fields.produce_value(&path)?;
                    self.route(&path, value)
                }
                Some(Frame::List(list)) => {
                    let value = list.produce_value(&path)?;
                    self.route(&path, value)
                }
                other => {
                    if let Some(frame) = other {
                        self.stack.push(frame);
                    }
                    Err(BuildError::UnexpectedEvent { event: event.tag() }.into())
                }
            },
        }
    }
}
