//! # Events
//!
//! The unit of communication between stages: one structural occurrence in a
//! tree-shaped value. A value is a linear sequence of events:
//!
//! ```text
//! StructStart("Person")
//!   FieldStart("name")  Value("Ada")
//!   FieldStart("tags")  ListStart(string)  Value("x")  Value("y")  End
//! End
//! ```
//!
//! An [`Event`] may borrow its payload from the producer (a decoder's input
//! buffer, a visited domain value). It is valid only for the duration of the
//! `process` call it is passed to; a stage that must keep it takes a
//! [`snapshot`](Event::snapshot).

use crate::{path::ObjectPath, types::TypeReference, types::builtin};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// An already-typed value supplied by the domain layer.
///
/// Domain values travel through the pipeline untouched; their declared type
/// name is what list element checks compare against.
pub trait DomainValue: fmt::Debug + Send + Sync + 'static {
    /// Qualified type name of this value.
    fn type_name(&self) -> &str;

    /// Downcasting support for factories.
    fn as_any(&self) -> &dyn Any;

    /// Value equality across the trait object. Defaults to identity only.
    fn dyn_eq(&self, other: &dyn DomainValue) -> bool {
        let _ = other;
        false
    }
}

/// A leaf value.
#[derive(Debug, Clone)]
pub enum Scalar<'a> {
    /// Absent value.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(Cow<'a, str>),
    /// Raw bytes.
    Buffer(Cow<'a, [u8]>),
    /// Instant in UTC.
    Timestamp(DateTime<Utc>),
    /// Opaque, already-typed domain value.
    Domain(Arc<dyn DomainValue>),
}

impl<'a> Scalar<'a> {
    /// Effective type name, compared against list element types.
    pub fn type_name(&self) -> &str {
        match self {
            Scalar::Null => builtin::NULL,
            Scalar::Boolean(_) => builtin::BOOLEAN,
            Scalar::Integer(_) => builtin::INTEGER,
            Scalar::Float(_) => builtin::FLOAT,
            Scalar::String(_) => builtin::STRING,
            Scalar::Buffer(_) => builtin::BUFFER,
            Scalar::Timestamp(_) => builtin::TIMESTAMP,
            Scalar::Domain(value) => value.type_name(),
        }
    }

    /// Returns `true` for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// A borrowed view of this scalar.
    pub fn reborrow(&self) -> Scalar<'_> {
        match self {
            Scalar::Null => Scalar::Null,
            Scalar::Boolean(v) => Scalar::Boolean(*v),
            Scalar::Integer(v) => Scalar::Integer(*v),
            Scalar::Float(v) => Scalar::Float(*v),
            Scalar::String(v) => Scalar::String(Cow::Borrowed(v.as_ref())),
            Scalar::Buffer(v) => Scalar::Buffer(Cow::Borrowed(v.as_ref())),
            Scalar::Timestamp(v) => Scalar::Timestamp(*v),
            Scalar::Domain(v) => Scalar::Domain(Arc::clone(v)),
        }
    }

    /// Detaches this scalar from any borrowed input.
    pub fn into_owned(self) -> Scalar<'static> {
        match self {
            Scalar::Null => Scalar::Null,
            Scalar::Boolean(v) => Scalar::Boolean(v),
            Scalar::Integer(v) => Scalar::Integer(v),
            Scalar::Float(v) => Scalar::Float(v),
            Scalar::String(v) => Scalar::String(Cow::Owned(v.into_owned())),
            Scalar::Buffer(v) => Scalar::Buffer(Cow::Owned(v.into_owned())),
            Scalar::Timestamp(v) => Scalar::Timestamp(v),
            Scalar::Domain(v) => Scalar::Domain(v),
        }
    }

    /// The text payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Scalar<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Buffer(a), Scalar::Buffer(b)) => a == b,
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a == b,
            (Scalar::Domain(a), Scalar::Domain(b)) => Arc::ptr_eq(a, b) || a.dyn_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Boolean(v) => write!(f, "{v}"),
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::String(v) => write!(f, "{v:?}"),
            Scalar::Buffer(v) => write!(f, "<{} bytes>", v.len()),
            Scalar::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Scalar::Domain(v) => write!(f, "<{}>", v.type_name()),
        }
    }
}

impl From<bool> for Scalar<'_> {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<i32> for Scalar<'_> {
    fn from(v: i32) -> Self {
        Scalar::Integer(i64::from(v))
    }
}

impl From<f64> for Scalar<'_> {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(v: &'a str) -> Self {
        Scalar::String(Cow::Borrowed(v))
    }
}

impl From<String> for Scalar<'_> {
    fn from(v: String) -> Self {
        Scalar::String(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Scalar<'a> {
    fn from(v: &'a [u8]) -> Self {
        Scalar::Buffer(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for Scalar<'_> {
    fn from(v: Vec<u8>) -> Self {
        Scalar::Buffer(Cow::Owned(v))
    }
}

impl From<DateTime<Utc>> for Scalar<'_> {
    fn from(v: DateTime<Utc>) -> Self {
        Scalar::Timestamp(v)
    }
}

/// Payload-free discriminant of an event, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    /// [`EventKind::Value`]
    Value,
    /// [`EventKind::ListStart`]
    ListStart,
    /// [`EventKind::MapStart`]
    MapStart,
    /// [`EventKind::StructStart`]
    StructStart,
    /// [`EventKind::FieldStart`]
    FieldStart,
    /// [`EventKind::End`]
    End,
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventTag::Value => "value",
            EventTag::ListStart => "list start",
            EventTag::MapStart => "map start",
            EventTag::StructStart => "struct start",
            EventTag::FieldStart => "field start",
            EventTag::End => "end",
        })
    }
}

/// The payload of an event; exactly one per tag.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind<'a> {
    /// A leaf value.
    Value(Scalar<'a>),
    /// Opens a list whose elements must be assignable to the given type.
    ListStart(Cow<'a, TypeReference>),
    /// Opens a field-set with no declared type.
    MapStart,
    /// Opens a field-set of the named type.
    StructStart(Cow<'a, str>),
    /// Opens a field of the nearest field-set; exactly one value follows.
    FieldStart(Cow<'a, str>),
    /// Closes the nearest open list or field-set.
    End,
}

impl<'a> EventKind<'a> {
    /// The discriminant.
    pub fn tag(&self) -> EventTag {
        match self {
            EventKind::Value(_) => EventTag::Value,
            EventKind::ListStart(_) => EventTag::ListStart,
            EventKind::MapStart => EventTag::MapStart,
            EventKind::StructStart(_) => EventTag::StructStart,
            EventKind::FieldStart(_) => EventTag::FieldStart,
            EventKind::End => EventTag::End,
        }
    }

    /// Returns `true` for list, map and struct starts.
    pub fn is_container_start(&self) -> bool {
        matches!(
            self,
            EventKind::ListStart(_) | EventKind::MapStart | EventKind::StructStart(_)
        )
    }

    /// A borrowed view of this payload.
    pub fn reborrow(&self) -> EventKind<'_> {
        match self {
            EventKind::Value(scalar) => EventKind::Value(scalar.reborrow()),
            EventKind::ListStart(element) => EventKind::ListStart(Cow::Borrowed(element.as_ref())),
            EventKind::MapStart => EventKind::MapStart,
            EventKind::StructStart(name) => EventKind::StructStart(Cow::Borrowed(name.as_ref())),
            EventKind::FieldStart(name) => EventKind::FieldStart(Cow::Borrowed(name.as_ref())),
            EventKind::End => EventKind::End,
        }
    }

    /// Detaches this payload from any borrowed input.
    pub fn into_owned(self) -> EventKind<'static> {
        match self {
            EventKind::Value(scalar) => EventKind::Value(scalar.into_owned()),
            EventKind::ListStart(element) => {
                EventKind::ListStart(Cow::Owned(element.into_owned()))
            }
            EventKind::MapStart => EventKind::MapStart,
            EventKind::StructStart(name) => EventKind::StructStart(Cow::Owned(name.into_owned())),
            EventKind::FieldStart(name) => EventKind::FieldStart(Cow::Owned(name.into_owned())),
            EventKind::End => EventKind::End,
        }
    }
}

impl fmt::Display for EventKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Value(scalar) => write!(f, "value {scalar}"),
            EventKind::ListStart(element) => write!(f, "list start <{element}>"),
            EventKind::MapStart => f.write_str("map start"),
            EventKind::StructStart(name) => write!(f, "struct start {name}"),
            EventKind::FieldStart(name) => write!(f, "field start {name}"),
            EventKind::End => f.write_str("end"),
        }
    }
}

/// One structural occurrence, optionally tagged with its location.
///
/// The path is attached by a pipeline stage, never by the producer.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<'a> {
    kind: EventKind<'a>,
    path: Option<ObjectPath>,
}

impl<'a> Event<'a> {
    /// An untagged event.
    pub fn new(kind: EventKind<'a>) -> Self {
        Self { kind, path: None }
    }

    /// `Value(scalar)`.
    pub fn value(scalar: impl Into<Scalar<'a>>) -> Self {
        Self::new(EventKind::Value(scalar.into()))
    }

    /// `ListStart(element_type)`, borrowing the type.
    pub fn list_start(element_type: &'a TypeReference) -> Self {
        Self::new(EventKind::ListStart(Cow::Borrowed(element_type)))
    }

    /// `MapStart`.
    pub fn map_start() -> Self {
        Self::new(EventKind::MapStart)
    }

    /// `StructStart(type_name)`.
    pub fn struct_start(type_name: impl Into<Cow<'a, str>>) -> Self {
        Self::new(EventKind::StructStart(type_name.into()))
    }

    /// `FieldStart(name)`.
    pub fn field_start(name: impl Into<Cow<'a, str>>) -> Self {
        Self::new(EventKind::FieldStart(name.into()))
    }

    /// `End`.
    pub fn end() -> Self {
        Self::new(EventKind::End)
    }

    /// The payload.
    pub fn kind(&self) -> &EventKind<'a> {
        &self.kind
    }

    /// Consumes the event, returning the payload.
    pub fn into_kind(self) -> EventKind<'a> {
        self.kind
    }

    /// The discriminant.
    pub fn tag(&self) -> EventTag {
        self.kind.tag()
    }

    /// The attached path, if a path-setting stage ran upstream.
    pub fn path(&self) -> Option<&ObjectPath> {
        self.path.as_ref()
    }

    /// Replaces the attached path.
    pub fn set_path(&mut self, path: Option<ObjectPath>) {
        self.path = path;
    }

    /// Returns this event tagged with `path`.
    pub fn with_path(mut self, path: ObjectPath) -> Self {
        self.path = Some(path);
        self
    }

    /// A cheap borrowed view of this event, for re-tagging before forwarding.
    pub fn reborrow(&self) -> Event<'_> {
        Event {
            kind: self.kind.reborrow(),
            path: self.path.clone(),
        }
    }

    /// An independent owned copy that may outlive the current dispatch.
    pub fn snapshot(&self) -> Event<'static> {
        self.clone().into_owned()
    }

    /// Detaches this event from any borrowed input.
    pub fn into_owned(self) -> Event<'static> {
        Event {
            kind: self.kind.into_owned(),
            path: self.path,
        }
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} @ {path}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Money(i64);

    impl DomainValue for Money {
        fn type_name(&self) -> &str {
            "Money"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn dyn_eq(&self, other: &dyn DomainValue) -> bool {
            other
                .as_any()
                .downcast_ref::<Money>()
                .is_some_and(|o| o.0 == self.0)
        }
    }

    #[test]
    fn test_snapshot_outlives_input() {
        let snapshot = {
            let text = String::from("borrowed");
            let event = Event::value(text.as_str()).with_path(ObjectPath::root().field("a"));
            event.snapshot()
        };
        assert_eq!(snapshot.kind(), &EventKind::Value(Scalar::from("borrowed")));
        assert_eq!(snapshot.path().map(ToString::to_string).as_deref(), Some("a"));
    }

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(Scalar::from(1_i64).type_name(), builtin::INTEGER);
        assert_eq!(Scalar::from("x").type_name(), builtin::STRING);
        assert_eq!(Scalar::Null.type_name(), builtin::NULL);
        assert_eq!(Scalar::Domain(Arc::new(Money(5))).type_name(), "Money");
    }

    #[test]
    fn test_domain_equality() {
        let a = Scalar::Domain(Arc::new(Money(5)));
        let b = Scalar::Domain(Arc::new(Money(5)));
        let c = Scalar::Domain(Arc::new(Money(6)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reborrow_keeps_path() {
        let element = TypeReference::atomic(builtin::STRING);
        let event = Event::list_start(&element).with_path(ObjectPath::root().index(2));
        let view = event.reborrow();
        assert_eq!(view, event);
        assert_eq!(view.tag(), EventTag::ListStart);
        assert!(view.kind().is_container_start());
    }

    #[test]
    fn test_display() {
        let event = Event::field_start("name").with_path(ObjectPath::root().field("name"));
        assert_eq!(event.to_string(), "field start name @ name");
        assert_eq!(Event::end().to_string(), "end");
    }
}
