//! # arbor-std
//!
//! Standard stages for the Arbor tree-stream framework.
//!
//! This crate provides:
//! - **Validation**: [`StructuralCheck`], [`DepthTracker`]
//! - **Transformation**: [`PathSettingProcessor`], [`FieldOrderProcessor`]
//! - **Construction**: [`BuildReactor`], [`Tree`], [`TreeFactory`]
//! - **Production**: [`EventSend`], [`Tree::emit`]
//! - **Composition**: [`Pipeline`], [`PipelineBuilder`], [`Tee`]
//! - **Model layer**: [`TypeTable`]
//! - **Observation**: [`LoggingReactor`] (with the `tracing` feature)
//! - **Testing**: [`testing`] reactors for assertions

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use arbor_core;

// Modules
pub mod build;
pub mod check;
pub mod order;
pub mod paths;
pub mod pipeline;
pub mod reactors;
pub mod registry;
pub mod send;
pub mod testing;
pub mod tree;

pub use build::BuildReactor;
pub use check::StructuralCheck;
pub use order::FieldOrderProcessor;
pub use paths::PathSettingProcessor;
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use reactors::{DepthTracker, LoggingReactor, Tee};
pub use registry::{TypeTable, TypeTableBuilder, TypeTableError};
pub use send::EventSend;
pub use tree::{Tree, TreeFactory};
