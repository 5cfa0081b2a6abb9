//! Nesting depth tracking.

use arbor_core::{ArborError, Event, EventKind, Reactor, StructuralError};

/// Tracks how deeply the stream is nested.
///
/// Field-sets and lists count one level each; fields do not. With a limit
/// set, opening a container beyond it fails with
/// [`StructuralError::TooDeep`].
#[derive(Debug, Clone, Default)]
pub struct DepthTracker {
    depth: usize,
    max_depth: usize,
    limit: Option<usize>,
}

impl DepthTracker {
    /// A tracker without a limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that rejects nesting deeper than `limit`.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Currently open containers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest nesting seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Reactor for DepthTracker {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        match event.kind() {
            kind if kind.is_container_start() => {
                if let Some(limit) = self.limit.filter(|limit| self.depth >= *limit) {
                    return Err(ArborError::structural(
                        StructuralError::TooDeep { limit },
                        event.path(),
                    ));
                }
                self.depth += 1;
                self.max_depth = self.max_depth.max(self.depth);
            }
            EventKind::End => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Ok(())
    }
}
