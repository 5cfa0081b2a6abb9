//! # arbor-core
//!
//! Core contracts for the Arbor tree-stream framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! codecs and model layers that produce or consume events without needing the
//! standard stages in `arbor-std`.
//!
//! # Layers
//!
//! ## Event model ([`Event`])
//!
//! A tree-shaped value travels as a linear sequence of events: container
//! starts, field starts, scalar values and ends. Events borrow from their
//! producer and are only valid for one dispatch; stages that retain them take
//! a [`snapshot`](Event::snapshot).
//!
//! ## Stages ([`Reactor`], [`Processor`])
//!
//! A reactor consumes events. A processor consumes an event together with a
//! handle to the next stage and decides what to forward. Pipelines compose
//! both kinds into a single entry reactor.
//!
//! ## Collaborators ([`TypeRegistry`], [`OrderGetter`])
//!
//! Type relationships and declared field orders come from an external model
//! layer through these read-only traits.
//!
//! ## Construction ([`Factory`], [`FieldSetBuilder`], [`ListBuilder`])
//!
//! The pluggable protocol a build reactor drives to materialize values.
//!
//! # Error Types
//!
//! - [`ArborError`] - Top-level error type
//! - [`StructuralError`] - Malformed sequences
//! - [`TypeError`] - Type mismatches
//! - [`MissingFieldsError`] - Absent required fields

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod builder;
mod error;
mod event;
mod field_order;
mod path;
mod reactor;
mod registry;
mod types;

// Re-exports
pub use builder::{Factory, FieldSetBuilder, ListBuilder};
pub use error::{
    ArborError, BoxError, BuildError, FieldOrderError, MissingFieldsError, StructuralError,
    TypeError,
};
pub use event::{DomainValue, Event, EventKind, EventTag, Scalar};
pub use field_order::{FieldOrder, FieldSpecification};
pub use path::{ListPath, ObjectPath, PathSegment};
pub use reactor::{Discard, FnReactor, Processor, Reactor, reactor_fn, replay};
pub use registry::{BasicRegistry, OrderGetter, TypeRegistry};
pub use types::{Restriction, TopType, TypeReference, ValueShape, builtin};
