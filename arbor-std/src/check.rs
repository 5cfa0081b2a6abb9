//! # Structural Check
//!
//! The sole guarantor that an event sequence is a balanced tree, that fields
//! only appear inside field-sets and are not repeated, and that list elements
//! are assignable to the declared element type.
//!
//! The check keeps an explicit stack of open contexts instead of recursing,
//! so nesting depth is bounded by memory rather than the call stack. It
//! validates exactly one top-level value; every event after that value
//! completes is rejected.

use arbor_core::{
    ArborError, BasicRegistry, Event, EventKind, ObjectPath, Reactor, StructuralError, TopType,
    TypeError, TypeReference, TypeRegistry, ValueShape,
};
use std::collections::HashSet;
use std::sync::Arc;

enum Context {
    List {
        element: TypeReference,
        allows_empty: bool,
        count: usize,
    },
    Map {
        seen: HashSet<String>,
    },
    Field(String),
}

/// Validates shape and type-consistency of one top-level value.
pub struct StructuralCheck {
    top: Option<TopType>,
    registry: Arc<dyn TypeRegistry>,
    stack: Vec<Context>,
    done: bool,
}

impl StructuralCheck {
    /// A check expecting a top-level value of shape `top`.
    pub fn new(top: TopType) -> Self {
        Self {
            top: Some(top),
            registry: Arc::new(BasicRegistry),
            stack: Vec::new(),
            done: false,
        }
    }

    /// A check accepting any top-level shape.
    pub fn unconstrained() -> Self {
        Self {
            top: None,
            ..Self::new(TopType::Value)
        }
    }

    /// Uses `registry` to resolve element assignability.
    pub fn with_registry(mut self, registry: Arc<dyn TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The declared top-level shape, if constrained.
    pub fn top_type(&self) -> Option<TopType> {
        self.top
    }

    /// Whether the top-level value has completed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current nesting depth, counting pending fields.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn check_top(&self, event: &Event<'_>) -> Result<(), ArborError> {
        match self.top {
            Some(top) if !top.admits(event.kind()) => Err(ArborError::structural(
                StructuralError::UnexpectedTopLevel {
                    expected: top,
                    actual: event.tag(),
                },
                event.path(),
            )),
            _ => Ok(()),
        }
    }

    /// Accounts for a value-producing event in the innermost context.
    fn enter_value(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        let Some(shape) = ValueShape::of(event.kind()) else {
            return Ok(());
        };
        match self.stack.last_mut() {
            None => self.check_top(event),
            Some(Context::List { element, count, .. }) => {
                if !element.accepts(&shape, self.registry.as_ref()) {
                    return Err(ArborError::type_error(
                        TypeError::ListElement {
                            expected: element.clone(),
                            actual: shape.to_string(),
                        },
                        event.path(),
                    ));
                }
                *count += 1;
                Ok(())
            }
            Some(Context::Field(_)) => {
                self.stack.pop();
                Ok(())
            }
            Some(Context::Map { .. }) => Err(ArborError::structural(
                StructuralError::UnexpectedEvent {
                    event: event.tag(),
                    context: "inside a field-set without a field start",
                },
                event.path(),
            )),
        }
    }

    /// Whether a list nested directly in the current context must be non-empty.
    fn nested_allows_empty(&self) -> bool {
        match self.stack.last() {
            Some(Context::List { element, .. }) => match element.innermost() {
                TypeReference::List { allows_empty, .. } => *allows_empty,
                _ => true,
            },
            _ => true,
        }
    }

    fn finish_container(&mut self, path: Option<&ObjectPath>) -> Result<(), ArborError> {
        match self.stack.pop() {
            Some(Context::List {
                element,
                allows_empty: false,
                count: 0,
            }) => {
                return Err(ArborError::type_error(TypeError::EmptyList { element }, path));
            }
            Some(Context::List { .. } | Context::Map { .. }) => {}
            Some(Context::Field(name)) => {
                return Err(ArborError::structural(
                    StructuralError::MissingFieldValue { name },
                    path,
                ));
            }
            None => {
                return Err(ArborError::structural(
                    StructuralError::UnexpectedEvent {
                        event: arbor_core::EventTag::End,
                        context: "with no open container",
                    },
                    path,
                ));
            }
        }
        if self.stack.is_empty() {
            self.done = true;
        }
        Ok(())
    }
}

impl Reactor for StructuralCheck {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        if self.done {
            return Err(ArborError::structural(
                StructuralError::AfterCompletion { event: event.tag() },
                event.path(),
            ));
        }

        match event.kind() {
            EventKind::Value(_) => {
                let top_level = self.stack.is_empty();
                self.enter_value(event)?;
                if top_level {
                    self.done = true;
                }
            }
            EventKind::ListStart(element) => {
                let allows_empty = self.nested_allows_empty();
                self.enter_value(event)?;
                self.stack.push(Context::List {
                    element: element.clone().into_owned(),
                    allows_empty,
                    count: 0,
                });
            }
            EventKind::MapStart | EventKind::StructStart(_) => {
                self.enter_value(event)?;
                self.stack.push(Context::Map {
                    seen: HashSet::new(),
                });
            }
            EventKind::FieldStart(name) => match self.stack.last_mut() {
                Some(Context::Map { seen }) => {
                    if !seen.insert(name.to_string()) {
                        return Err(ArborError::structural(
                            StructuralError::DuplicateField {
                                name: name.to_string(),
                            },
                            event.path(),
                        ));
                    }
                    self.stack.push(Context::Field(name.to_string()));
                }
                Some(Context::List { .. }) => {
                    return Err(ArborError::structural(
                        StructuralError::UnexpectedEvent {
                            event: event.tag(),
                            context: "inside a list",
                        },
                        event.path(),
                    ));
                }
                Some(Context::Field(_)) => {
                    return Err(ArborError::structural(
                        StructuralError::UnexpectedEvent {
                            event: event.tag(),
                            context: "while a field is awaiting its value",
                        },
                        event.path(),
                    ));
                }
                None => {
                    self.check_top(event)?;
                    return Err(ArborError::structural(
                        StructuralError::UnexpectedEvent {
                            event: event.tag(),
                            context: "at the top level",
                        },
                        event.path(),
                    ));
                }
            },
            EventKind::End => {
                if self.stack.is_empty() {
                    self.check_top(event)?;
                }
                self.finish_container(event.path())?;
            }
        }
        Ok(())
    }
}
