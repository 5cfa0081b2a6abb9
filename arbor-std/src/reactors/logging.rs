//! Logging reactor for event observation.

use arbor_core::{ArborError, Event, Reactor};

/// A reactor that logs events for debugging and observation.
///
/// Emits one `debug` record per event when the `tracing` feature is enabled,
/// and does nothing otherwise.
#[derive(Debug, Clone, Default)]
pub struct LoggingReactor {
    name: Option<&'static str>,
}

impl LoggingReactor {
    /// An unnamed logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger whose records carry `name`, to tell several apart.
    pub fn named(name: &'static str) -> Self {
        Self { name: Some(name) }
    }

    /// The configured name.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl Reactor for LoggingReactor {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        #[cfg(feature = "tracing")]
        {
            let path = event.path().map(ToString::to_string);
            tracing::debug!(stage = self.name.unwrap_or("arbor"), kind = %event.kind(), ?path, "event");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = event;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_reactor_accepts_everything() {
        let mut logger = LoggingReactor::named("input");
        assert_eq!(logger.name(), Some("input"));
        logger.process(&Event::map_start()).unwrap();
        logger.process(&Event::end()).unwrap();
    }
}
