//! # arbor - Streaming Tree Events
//!
//! `arbor` validates, annotates, reorders and materializes tree-shaped
//! values while they stream as a flat sequence of events. A producer (a
//! decoder or a visitor over a domain value) pushes events into a
//! [`Pipeline`]; each stage checks or transforms them and forwards them
//! toward a tail, typically a [`BuildReactor`].
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor::prelude::*;
//! use std::sync::Arc;
//!
//! let table = Arc::new(
//!     TypeTable::builder()
//!         .order("Point", FieldOrder::new([
//!             FieldSpecification::required("x"),
//!             FieldSpecification::required("y"),
//!         ])?)
//!         .build()?,
//! );
//!
//! let mut pipeline = Pipeline::builder()
//!     .expect(TopType::Struct)
//!     .registry(table.clone())
//!     .set_paths()
//!     .order_fields(table)
//!     .tail(BuildReactor::new(TreeFactory))
//!     .build();
//!
//! let mut send = EventSend::new(&mut pipeline);
//! send.start_struct("Point")?;
//! send.field("y", 2_i64)?;
//! send.field("x", 1_i64)?;
//! send.end()?;
//!
//! let point = pipeline.tail_mut().take_result()?;
//! assert_eq!(
//!     point,
//!     Tree::structure("Point", [("x", Tree::scalar(1_i64)), ("y", Tree::scalar(2_i64))]),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use arbor_core::{
    // Errors
    ArborError,
    BasicRegistry,
    BoxError,
    BuildError,
    // Stages
    Discard,
    // Model collaborators
    DomainValue,
    // Events
    Event,
    EventKind,
    EventTag,
    // Builder protocol
    Factory,
    FieldOrder,
    FieldOrderError,
    FieldSetBuilder,
    FieldSpecification,
    FnReactor,
    ListBuilder,
    // Paths
    ListPath,
    MissingFieldsError,
    ObjectPath,
    OrderGetter,
    PathSegment,
    Processor,
    Reactor,
    Restriction,
    Scalar,
    StructuralError,
    // Types
    TopType,
    TypeError,
    TypeReference,
    TypeRegistry,
    ValueShape,
    builtin,
    reactor_fn,
    replay,
};

pub use arbor_std::{
    BuildReactor, DepthTracker, EventSend, FieldOrderProcessor, LoggingReactor,
    PathSettingProcessor, Pipeline, PipelineBuilder, Stage, StructuralCheck, Tee, Tree,
    TreeFactory, TypeTable, TypeTableBuilder, TypeTableError,
};

/// Testing utilities.
pub mod testing {
    pub use arbor_std::testing::{CountingReactor, FailingReactor, RecordingReactor};
}

/// Prelude module - common imports for Arbor.
///
/// # Usage
///
/// ```rust
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArborError, BuildReactor, Event, EventKind, EventSend, FieldOrder, FieldSpecification,
        ObjectPath, Pipeline, Processor, Reactor, Scalar, StructuralCheck, TopType, Tree,
        TreeFactory, TypeReference, TypeTable,
    };
}
