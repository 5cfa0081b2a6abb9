//! # Pipelines
//!
//! A [`Pipeline`] composes stages into a single entry [`Reactor`]. Each event
//! enters the first stage and flows toward the tail:
//!
//! ```text
//! event ─▶ [Check] ─▶ [Processor] ─▶ [Reactor] ─▶ ... ─▶ tail
//! ```
//!
//! - A [`Stage::Check`] or [`Stage::Reactor`] observes the event and, on
//!   success, passes it on unchanged.
//! - A [`Stage::Processor`] receives the remainder of the chain as its next
//!   reactor and decides what to forward.
//!
//! The first error aborts the dispatch and poisons the pipeline: every later
//! event is refused with [`ArborError::Poisoned`].
//!
//! # Example
//!
//! ```rust
//! use arbor_core::{Event, Reactor, TopType};
//! use arbor_std::{Pipeline, testing::RecordingReactor};
//!
//! let recorder = RecordingReactor::new();
//! let mut pipeline = Pipeline::builder()
//!     .expect(TopType::Map)
//!     .set_paths()
//!     .tail(recorder.clone())
//!     .build();
//!
//! pipeline.process(&Event::map_start()).unwrap();
//! pipeline.process(&Event::field_start("a")).unwrap();
//! pipeline.process(&Event::value(1_i64)).unwrap();
//! pipeline.process(&Event::end()).unwrap();
//! assert_eq!(recorder.paths(), vec!["$", "a", "a", "$"]);
//! ```

use crate::{check::StructuralCheck, order::FieldOrderProcessor, paths::PathSettingProcessor};
use arbor_core::{
    ArborError, BasicRegistry, Discard, Event, ObjectPath, OrderGetter, Processor, Reactor,
    TopType, TypeRegistry,
};
use std::sync::Arc;

/// One link of a pipeline.
pub enum Stage {
    /// A structural check; observes and passes the event on.
    Check(StructuralCheck),
    /// An observing reactor; passes the event on after it succeeds.
    Reactor(Box<dyn Reactor>),
    /// A processor that forwards to the rest of the chain itself.
    Processor(Box<dyn Processor>),
}

impl Stage {
    fn requires_structural_check(&self) -> bool {
        match self {
            Stage::Processor(processor) => processor.requires_structural_check(),
            Stage::Check(_) | Stage::Reactor(_) => false,
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Check(check) => f.debug_tuple("Check").field(&check.top_type()).finish(),
            Stage::Reactor(_) => f.write_str("Reactor"),
            Stage::Processor(_) => f.write_str("Processor"),
        }
    }
}

/// The rest of a pipeline, seen from one stage.
struct Chain<'p, 'r> {
    stages: &'p mut [Stage],
    tail: &'p mut (dyn Reactor + 'r),
}

impl Reactor for Chain<'_, '_> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        let Some((stage, rest)) = self.stages.split_first_mut() else {
            return self.tail.process(event);
        };
        let mut next = Chain {
            stages: rest,
            tail: &mut *self.tail,
        };
        match stage {
            Stage::Check(check) => {
                check.process(event)?;
                next.process(event)
            }
            Stage::Reactor(reactor) => {
                reactor.process(event)?;
                next.process(event)
            }
            Stage::Processor(processor) => processor.process(event, &mut next),
        }
    }
}

/// A composed chain of stages ending in a tail reactor.
pub struct Pipeline<R = Discard> {
    stages: Vec<Stage>,
    tail: R,
    poisoned: bool,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }
}

impl<R> Pipeline<R> {
    /// The configured stages, head first.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The tail reactor.
    pub fn tail(&self) -> &R {
        &self.tail
    }

    /// The tail reactor, mutably.
    pub fn tail_mut(&mut self) -> &mut R {
        &mut self.tail
    }

    /// Discards the stages and returns the tail.
    pub fn into_tail(self) -> R {
        self.tail
    }

    /// Whether a stage has failed.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}

impl<R: Reactor> Reactor for Pipeline<R> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        if self.poisoned {
            return Err(ArborError::Poisoned);
        }
        let result = Chain {
            stages: &mut self.stages,
            tail: &mut self.tail,
        }
        .process(event);
        if let Err(_err) = &result {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, event = %event.kind(), "pipeline stage failed; pipeline poisoned");
            self.poisoned = true;
        }
        result
    }
}

/// Builder for constructing a [`Pipeline`].
pub struct PipelineBuilder<R = Discard> {
    top: Option<TopType>,
    registry: Arc<dyn TypeRegistry>,
    stages: Vec<Stage>,
    tail: R,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Create a new empty builder ending in [`Discard`].
    pub fn new() -> Self {
        Self {
            top: None,
            registry: Arc::new(BasicRegistry),
            stages: Vec::new(),
            tail: Discard,
        }
    }
}

impl<R: Reactor> PipelineBuilder<R> {
    /// Top-level shape for automatically inserted structural checks.
    pub fn expect(mut self, top: TopType) -> Self {
        self.top = Some(top);
        self
    }

    /// Type registry for automatically inserted structural checks.
    pub fn registry(mut self, registry: Arc<dyn TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Append a stage.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append a structural check.
    pub fn check(self, check: StructuralCheck) -> Self {
        self.stage(Stage::Check(check))
    }

    /// Append an observing reactor.
    pub fn reactor<T: Reactor + 'static>(self, reactor: T) -> Self {
        self.stage(Stage::Reactor(Box::new(reactor)))
    }

    /// Append a processor.
    pub fn processor<P: Processor + 'static>(self, processor: P) -> Self {
        self.stage(Stage::Processor(Box::new(processor)))
    }

    /// Append a [`PathSettingProcessor`] rooted at `$`.
    pub fn set_paths(self) -> Self {
        self.processor(PathSettingProcessor::new())
    }

    /// Append a [`PathSettingProcessor`] rooted at `start`.
    pub fn set_paths_from(self, start: ObjectPath) -> Self {
        self.processor(PathSettingProcessor::starting_at(start))
    }

    /// Append a [`FieldOrderProcessor`] using `orders`.
    pub fn order_fields(self, orders: Arc<dyn OrderGetter>) -> Self {
        self.processor(FieldOrderProcessor::new(orders))
    }

    /// Terminate the pipeline in `tail` instead of discarding.
    pub fn tail<T: Reactor>(self, tail: T) -> PipelineBuilder<T> {
        PipelineBuilder {
            top: self.top,
            registry: self.registry,
            stages: self.stages,
            tail,
        }
    }

    /// Build the pipeline.
    ///
    /// If a stage that relies on well-formed input is not preceded by a
    /// [`StructuralCheck`], one is inserted directly ahead of it, configured
    /// with the expected top type and registry.
    pub fn build(self) -> Pipeline<R> {
        let mut stages = self.stages;
        let checked = stages
            .iter()
            .position(|stage| matches!(stage, Stage::Check(_)));
        let needy = stages
            .iter()
            .position(Stage::requires_structural_check);
        if let Some(index) = needy.filter(|&needy| checked.is_none_or(|checked| checked > needy)) {
            let check = match self.top {
                Some(top) => StructuralCheck::new(top),
                None => StructuralCheck::unconstrained(),
            };
            stages.insert(index, Stage::Check(check.with_registry(self.registry)));
        }
        Pipeline {
            stages,
            tail: self.tail,
            poisoned: false,
        }
    }
}
