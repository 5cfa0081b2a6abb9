//! # Event Sending
//!
//! A typed front-end for producers. [`EventSend`] wraps a reactor and turns
//! one call per structural step into the corresponding event.
//!
//! ```rust,ignore
//! let mut send = EventSend::new(pipeline);
//! send.start_struct("Point")?;
//! send.field("x", 1_i64)?;
//! send.field("y", 2_i64)?;
//! send.end()?;
//! ```

use arbor_core::{ArborError, Event, Reactor, Scalar, TypeReference};

/// Emits events into a wrapped reactor.
#[derive(Debug, Default)]
pub struct EventSend<R> {
    target: R,
}

impl<R: Reactor> EventSend<R> {
    /// Sends into `target`.
    pub fn new(target: R) -> Self {
        Self { target }
    }

    /// Emits `Value(scalar)`.
    pub fn value<'a>(&mut self, scalar: impl Into<Scalar<'a>>) -> Result<(), ArborError> {
        self.target.process(&Event::value(scalar))
    }

    /// Emits `ListStart(element_type)`.
    pub fn start_list(&mut self, element_type: &TypeReference) -> Result<(), ArborError> {
        self.target.process(&Event::list_start(element_type))
    }

    /// Emits `MapStart`.
    pub fn start_map(&mut self) -> Result<(), ArborError> {
        self.target.process(&Event::map_start())
    }

    /// Emits `StructStart(type_name)`.
    pub fn start_struct(&mut self, type_name: &str) -> Result<(), ArborError> {
        self.target.process(&Event::struct_start(type_name))
    }

    /// Emits `FieldStart(name)`.
    pub fn start_field(&mut self, name: &str) -> Result<(), ArborError> {
        self.target.process(&Event::field_start(name))
    }

    /// Emits `End`.
    pub fn end(&mut self) -> Result<(), ArborError> {
        self.target.process(&Event::end())
    }

    /// Emits `FieldStart(name)` followed by `Value(scalar)`.
    pub fn field<'a>(
        &mut self,
        name: &str,
        scalar: impl Into<Scalar<'a>>,
    ) -> Result<(), ArborError> {
        self.start_field(name)?;
        self.value(scalar)
    }

    /// The wrapped reactor.
    pub fn target(&self) -> &R {
        &self.target
    }

    /// The wrapped reactor, mutably.
    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    /// Unwraps the reactor.
    pub fn into_inner(self) -> R {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingReactor;
    use arbor_core::{EventKind, builtin};

    #[test]
    fn test_send_struct() {
        let recorder = RecordingReactor::new();
        let mut send = EventSend::new(recorder.clone());
        send.start_struct("Point").unwrap();
        send.field("x", 1_i64).unwrap();
        send.start_field("tags").unwrap();
        send.start_list(&TypeReference::atomic(builtin::STRING))
            .unwrap();
        send.value("a").unwrap();
        send.end().unwrap();
        send.end().unwrap();

        let kinds = recorder.kinds();
        assert_eq!(kinds.len(), 8);
        assert_eq!(kinds[0], EventKind::StructStart("Point".into()));
        assert_eq!(kinds[2], EventKind::Value(Scalar::Integer(1)));
        assert!(matches!(kinds[4], EventKind::ListStart(_)));
        assert_eq!(kinds[7], EventKind::End);
    }

    #[test]
    fn test_into_inner() {
        let mut send = EventSend::new(crate::testing::CountingReactor::default());
        send.start_map().unwrap();
        send.end().unwrap();
        assert_eq!(send.target().count(), 2);
        assert_eq!(send.into_inner().count(), 2);
    }
}
