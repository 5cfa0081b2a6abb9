//! Error types for Arbor.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`ArborError`] - Top-level error type returned by every stage
//! - [`StructuralError`] - Malformed event sequences
//! - [`TypeError`] - List element type mismatches
//! - [`MissingFieldsError`] - Required fields absent at struct end
//! - [`BuildError`] - Misuse of a build reactor's result
//! - [`FieldOrderError`] - Invalid field order declarations
//!
//! Every error is terminal for the stream that raised it.

use crate::{
    event::EventTag,
    path::ObjectPath,
    types::{TopType, TypeReference},
};
use thiserror::Error;

/// A boxed error type for user-supplied builder failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Arbor operations.
#[derive(Error, Debug)]
pub enum ArborError {
    /// The event sequence is not a well-formed tree.
    #[error("{source}{}", at(.path))]
    Structural {
        /// What went wrong.
        source: StructuralError,
        /// Location of the offending event, if known.
        path: Option<ObjectPath>,
    },

    /// A value does not match its declared type.
    #[error("{source}{}", at(.path))]
    Type {
        /// What went wrong.
        source: TypeError,
        /// Location of the offending event, if known.
        path: Option<ObjectPath>,
    },

    /// A struct closed without all of its required fields.
    #[error(transparent)]
    MissingFields(#[from] MissingFieldsError),

    /// A build reactor was driven or queried out of order.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// A user-supplied factory or builder failed.
    #[error(transparent)]
    Builder(BoxError),

    /// The pipeline already failed and must be discarded.
    #[error("pipeline already failed; discard it and start a new one")]
    Poisoned,
}

impl ArborError {
    /// A structural error at an optional location.
    pub fn structural(source: StructuralError, path: Option<&ObjectPath>) -> Self {
        ArborError::Structural {
            source,
            path: path.cloned(),
        }
    }

    /// A type error at an optional location.
    pub fn type_error(source: TypeError, path: Option<&ObjectPath>) -> Self {
        ArborError::Type {
            source,
            path: path.cloned(),
        }
    }

    /// The location carried by this error, if any.
    pub fn path(&self) -> Option<&ObjectPath> {
        match self {
            ArborError::Structural { path, .. } | ArborError::Type { path, .. } => path.as_ref(),
            ArborError::MissingFields(err) => err.path.as_ref(),
            ArborError::Build(_) | ArborError::Builder(_) | ArborError::Poisoned => None,
        }
    }
}

fn at(path: &Option<ObjectPath>) -> String {
    match path {
        Some(path) => format!(" at {path}"),
        None => String::new(),
    }
}

/// Malformed event sequences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The first event does not open the expected top-level shape.
    #[error("expected a top-level {expected} but got {actual}")]
    UnexpectedTopLevel {
        /// Declared shape.
        expected: TopType,
        /// First event seen.
        actual: EventTag,
    },

    /// The event is not legal in the current context.
    #[error("unexpected {event} {context}")]
    UnexpectedEvent {
        /// Offending event.
        event: EventTag,
        /// Where it arrived, e.g. "inside a list".
        context: &'static str,
    },

    /// A field name appeared twice in one field-set.
    #[error("duplicate field `{name}`")]
    DuplicateField {
        /// The repeated name.
        name: String,
    },

    /// A field was opened and its field-set closed before any value.
    #[error("field `{name}` has no value")]
    MissingFieldValue {
        /// The unsatisfied field.
        name: String,
    },

    /// An event arrived after the top-level value completed.
    #[error("saw {event} after value was built")]
    AfterCompletion {
        /// Offending event.
        event: EventTag,
    },

    /// Nesting exceeded a configured limit.
    #[error("nesting deeper than {limit} levels")]
    TooDeep {
        /// The configured limit.
        limit: usize,
    },
}

/// Values that do not match their declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A list element is not assignable to the list's element type.
    #[error("list element of type {actual} is not assignable to {expected}")]
    ListElement {
        /// Declared element type.
        expected: TypeReference,
        /// Effective type of the element.
        actual: String,
    },

    /// A list declared non-empty closed with no elements.
    #[error("list of {element} must not be empty")]
    EmptyList {
        /// Declared element type.
        element: TypeReference,
    },
}

/// Required fields absent when a struct closed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required fields [{}] of {type_name}{}", .missing.join(", "), at(.path))]
pub struct MissingFieldsError {
    /// The struct's declared type.
    pub type_name: String,
    /// Location of the struct, if known.
    pub path: Option<ObjectPath>,
    /// Missing field names, in declared order.
    pub missing: Vec<String>,
}

/// Misuse of a build reactor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The result was requested before the top-level value completed.
    #[error("value is not complete")]
    NotComplete,

    /// The result was already taken.
    #[error("value was already taken")]
    AlreadyTaken,

    /// An event arrived after the top-level value completed.
    #[error("saw {event} after value was built")]
    AlreadyComplete {
        /// Offending event.
        event: EventTag,
    },

    /// The event does not fit the builder stack.
    #[error("unexpected {event} for the current builder")]
    UnexpectedEvent {
        /// Offending event.
        event: EventTag,
    },
}

/// Invalid field order declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldOrderError {
    /// A field name is declared more than once.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

impl From<BoxError> for ArborError {
    fn from(err: BoxError) -> Self {
        ArborError::Builder(err)
    }
}
