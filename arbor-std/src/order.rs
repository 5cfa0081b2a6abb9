//! # Field Ordering
//!
//! Re-emits the fields of each struct in the canonical order declared for
//! its type, and rejects structs that close without their required fields.
//!
//! Fields that arrive in position pass straight through. A declared field
//! that arrives early is captured (its whole subtree, as snapshots) and
//! replayed once every field declared before it has been emitted. Fields the
//! order does not mention are forwarded immediately, interleaved with the
//! ordered ones.
//!
//! ```text
//! order of T: [a (required), b (required)]
//!
//! in : StructStart(T) FieldStart(b) Value(2) FieldStart(a) Value(1) End
//! out: StructStart(T) FieldStart(a) Value(1) FieldStart(b) Value(2) End
//! ```
//!
//! Only the order *across* one struct's fields changes; events inside a
//! field's subtree keep their relative order. Structs nested inside a
//! captured field are reordered before they are captured.

use crate::paths::PathSettingProcessor;
use arbor_core::{
    ArborError, Event, EventKind, FieldOrder, MissingFieldsError, ObjectPath, OrderGetter,
    Processor, Reactor, StructuralError,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// How a field of the enclosing field-set is being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldMode {
    /// Head of the declared queue; forwarded directly.
    InOrder,
    /// Declared but early; captured for replay.
    Captured,
    /// Not declared, or the enclosing field-set has no order.
    Unordered,
}

enum Frame {
    Ordered(Box<Accumulator>),
    Container,
    Field { name: String, mode: FieldMode },
}

/// Reordering state of one open struct with a declared order.
struct Accumulator {
    type_name: String,
    path: Option<ObjectPath>,
    order: Arc<FieldOrder>,
    pending: VecDeque<String>,
    waiting: HashSet<String>,
    unsatisfied: HashSet<String>,
    saved: HashMap<String, Vec<Event<'static>>>,
    capture: Option<Vec<Event<'static>>>,
    replay_paths: Option<PathSettingProcessor>,
}

impl Accumulator {
    fn new(type_name: &str, path: Option<&ObjectPath>, order: Arc<FieldOrder>) -> Self {
        Self {
            type_name: type_name.to_owned(),
            path: path.cloned(),
            pending: order.iter().map(|field| field.name.clone()).collect(),
            waiting: order.iter().map(|field| field.name.clone()).collect(),
            unsatisfied: order.required().map(str::to_owned).collect(),
            saved: HashMap::new(),
            capture: None,
            replay_paths: path.cloned().map(PathSettingProcessor::within_field_set),
            order,
        }
    }

    /// Whether `name` is declared and not yet emitted.
    fn is_pending(&self, name: &str) -> bool {
        self.waiting.contains(name)
    }

    fn pop_pending(&mut self) -> Option<String> {
        let name = self.pending.pop_front()?;
        self.waiting.remove(&name);
        Some(name)
    }

    fn is_required(&self, name: &str) -> bool {
        self.order.get(name).is_some_and(|field| field.required)
    }

    fn missing(&self) -> Vec<String> {
        self.order
            .required()
            .filter(|name| self.unsatisfied.contains(*name))
            .map(str::to_owned)
            .collect()
    }
}

/// Routes emitted events to the innermost active capture, or downstream.
struct Sink<'s, 'r> {
    stack: &'s mut [Frame],
    next: &'s mut (dyn Reactor + 'r),
}

impl Reactor for Sink<'_, '_> {
    fn process(&mut self, event: &Event<'_>) -> Result<(), ArborError> {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Ordered(acc) = frame {
                if let Some(buffer) = acc.capture.as_mut() {
                    buffer.push(event.snapshot());
                    return Ok(());
                }
            }
        }
        self.next.process(event)
    }
}

/// Resequences struct fields into their declared order.
pub struct FieldOrderProcessor {
    orders: Arc<dyn OrderGetter>,
    stack: Vec<Frame>,
}

impl FieldOrderProcessor {
    /// Reorders every struct type for which `orders` declares an order.
    pub fn new(orders: Arc<dyn OrderGetter>) -> Self {
        Self {
            orders,
            stack: Vec::new(),
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn emit(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError> {
        Sink {
            stack: &mut self.stack,
            next,
        }
        .process(event)
    }

    fn start_field(
        &mut self,
        name: &str,
        event: &Event<'_>,
        next: &mut dyn Reactor,
    ) -> Result<(), ArborError> {
        let mode = match self.stack.last_mut() {
            Some(Frame::Ordered(acc)) => {
                if acc.pending.front().is_some_and(|head| head == name) {
                    acc.pop_pending();
                    FieldMode::InOrder
                } else if acc.is_pending(name) {
                    acc.capture = Some(Vec::new());
                    #[cfg(feature = "tracing")]
                    tracing::trace!(field = name, type_name = %acc.type_name, "buffering early field");
                    FieldMode::Captured
                } else {
                    FieldMode::Unordered
                }
            }
            _ => FieldMode::Unordered,
        };
        if mode != FieldMode::Captured {
            self.emit(event, next)?;
        }
        self.stack.push(Frame::Field {
            name: name.to_owned(),
            mode,
        });
        Ok(())
    }

    /// Called after a value (scalar or closed container) is emitted.
    fn complete_value(&mut self, next: &mut dyn Reactor) -> Result<(), ArborError> {
        let Some(Frame::Field { .. }) = self.stack.last() else {
            return Ok(());
        };
        let Some(Frame::Field { name, mode }) = self.stack.pop() else {
            return Ok(());
        };
        if mode == FieldMode::Unordered {
            return Ok(());
        }
        match self.stack.pop() {
            Some(Frame::Ordered(mut acc)) => {
                if mode == FieldMode::Captured {
                    let buffer = acc.capture.take().unwrap_or_default();
                    acc.saved.insert(name.clone(), buffer);
                }
                acc.unsatisfied.remove(&name);
                let drained = self.drain(&mut acc, false, next);
                self.stack.push(Frame::Ordered(acc));
                drained
            }
            Some(frame) => {
                self.stack.push(frame);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Emits saved fields from the head of the queue until one is missing.
    ///
    /// At struct end, missing optional fields are skipped instead.
    fn drain(
        &mut self,
        acc: &mut Accumulator,
        at_end: bool,
        next: &mut dyn Reactor,
    ) -> Result<(), ArborError> {
        while let Some(head) = acc.pending.front() {
            if let Some(events) = acc.saved.remove(head) {
                let Some(name) = acc.pop_pending() else {
                    break;
                };
                self.replay(acc, &name, &events, next)?;
            } else if at_end && !acc.is_required(head) {
                acc.pop_pending();
            } else {
                break;
            }
        }
        Ok(())
    }

    fn replay(
        &mut self,
        acc: &mut Accumulator,
        name: &str,
        events: &[Event<'static>],
        next: &mut dyn Reactor,
    ) -> Result<(), ArborError> {
        #[cfg(feature = "tracing")]
        tracing::trace!(field = name, type_name = %acc.type_name, events = events.len(), "replaying field");
        let mut sink = Sink {
            stack: &mut self.stack,
            next,
        };
        let field_start = Event::field_start(name);
        match acc.replay_paths.as_mut() {
            Some(paths) => {
                paths.process(&field_start, &mut sink)?;
                events
                    .iter()
                    .try_for_each(|event| paths.process(event, &mut sink))
            }
            None => {
                sink.process(&field_start)?;
                events.iter().try_for_each(|event| sink.process(event))
            }
        }
    }

    fn end(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError> {
        match self.stack.pop() {
            Some(Frame::Ordered(mut acc)) => {
                self.drain(&mut acc, true, next)?;
                let missing = acc.missing();
                if !missing.is_empty() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(type_name = %acc.type_name, ?missing, "struct closed without required fields");
                    return Err(MissingFieldsError {
                        type_name: acc.type_name,
                        path: acc.path,
                        missing,
                    }
                    .into());
                }
                self.emit(event, next)?;
            }
            Some(Frame::Container) => self.emit(event, next)?,
            Some(Frame::Field { .. }) | None => {
                return Err(ArborError::structural(
                    StructuralError::UnexpectedEvent {
                        event: event.tag(),
                        context: "with no open container",
                    },
                    event.path(),
                ));
            }
        }
        self.complete_value(next)
    }
}

impl Processor for FieldOrderProcessor {
    fn process(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError> {
        match event.kind() {
            EventKind::StructStart(type_name) => {
                self.emit(event, next)?;
                let frame = match self.orders.field_order(type_name) {
                    Some(order) => {
                        Frame::Ordered(Box::new(Accumulator::new(type_name, event.path(), order)))
                    }
                    None => Frame::Container,
                };
                self.stack.push(frame);
                Ok(())
            }
            EventKind::ListStart(_) | EventKind::MapStart => {
                self.emit(event, next)?;
                self.stack.push(Frame::Container);
                Ok(())
            }
            EventKind::FieldStart(name) => self.start_field(name, event, next),
            EventKind::Value(_) => {
                self.emit(event, next)?;
                self.complete_value(next)
            }
            EventKind::End => self.end(event, next),
        }
    }

    fn requires_structural_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingReactor;
    use arbor_core::{FieldSpecification, Scalar, TypeReference, builtin};

    fn orders() -> Arc<dyn OrderGetter> {
        let t = Arc::new(
            FieldOrder::new([
                FieldSpecification::required("a"),
                FieldSpecification::required("b"),
            ])
            .unwrap(),
        );
        let u = Arc::new(
            FieldOrder::new([
                FieldSpecification::optional("x"),
                FieldSpecification::required("y"),
                FieldSpecification::optional("z"),
            ])
            .unwrap(),
        );
        Arc::new(move |name: &str| match name {
            "T" => Some(Arc::clone(&t)),
            "U" => Some(Arc::clone(&u)),
            _ => None,
        })
    }

    fn run(events: &[Event<'_>]) -> (Result<(), ArborError>, Vec<Event<'static>>) {
        let recorder = RecordingReactor::new();
        let mut sink = recorder.clone();
        let mut processor = FieldOrderProcessor::new(orders());
        let result = events
            .iter()
            .try_for_each(|event| processor.process(event, &mut sink));
        (result, recorder.events())
    }

    fn kinds(events: &[Event<'static>]) -> Vec<EventKind<'static>> {
        events.iter().map(|event| event.kind().clone()).collect()
    }

    #[test]
    fn test_reorders_early_field() {
        let (result, out) = run(&[
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::value(2_i64),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                EventKind::StructStart("T".into()),
                EventKind::FieldStart("a".into()),
                EventKind::Value(Scalar::Integer(1)),
                EventKind::FieldStart("b".into()),
                EventKind::Value(Scalar::Integer(2)),
                EventKind::End,
            ]
        );
    }

    #[test]
    fn test_in_order_fields_pass_straight_through() {
        let recorder = RecordingReactor::new();
        let mut sink = recorder.clone();
        let mut processor = FieldOrderProcessor::new(orders());
        processor.process(&Event::struct_start("T"), &mut sink).unwrap();
        processor.process(&Event::field_start("a"), &mut sink).unwrap();
        assert_eq!(recorder.count(), 2);
        processor.process(&Event::value(1_i64), &mut sink).unwrap();
        assert_eq!(recorder.count(), 3);
    }

    #[test]
    fn test_missing_required_field() {
        let (result, out) = run(&[
            Event::struct_start("T"),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ]);
        let err = result.unwrap_err();
        match err {
            ArborError::MissingFields(MissingFieldsError {
                type_name, missing, ..
            }) => {
                assert_eq!(type_name, "T");
                assert_eq!(missing, vec!["b".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.iter().any(|event| event.kind() == &EventKind::End));
    }

    #[test]
    fn test_optional_fields_skipped_at_end() {
        let (result, out) = run(&[
            Event::struct_start("U"),
            Event::field_start("z"),
            Event::value(3_i64),
            Event::field_start("y"),
            Event::value(2_i64),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                EventKind::StructStart("U".into()),
                EventKind::FieldStart("y".into()),
                EventKind::Value(Scalar::Integer(2)),
                EventKind::FieldStart("z".into()),
                EventKind::Value(Scalar::Integer(3)),
                EventKind::End,
            ]
        );
    }

    #[test]
    fn test_undeclared_fields_forwarded_unordered() {
        let (result, out) = run(&[
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::value(2_i64),
            Event::field_start("extra"),
            Event::value("e"),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                EventKind::StructStart("T".into()),
                EventKind::FieldStart("extra".into()),
                EventKind::Value(Scalar::from("e")),
                EventKind::FieldStart("a".into()),
                EventKind::Value(Scalar::Integer(1)),
                EventKind::FieldStart("b".into()),
                EventKind::Value(Scalar::Integer(2)),
                EventKind::End,
            ]
        );
    }

    #[test]
    fn test_captured_subtree_keeps_internal_order() {
        let element = TypeReference::atomic(builtin::INTEGER);
        let (result, out) = run(&[
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::list_start(&element),
            Event::value(1_i64),
            Event::value(2_i64),
            Event::end(),
            Event::field_start("a"),
            Event::map_start(),
            Event::field_start("k"),
            Event::value("v"),
            Event::end(),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                EventKind::StructStart("T".into()),
                EventKind::FieldStart("a".into()),
                EventKind::MapStart,
                EventKind::FieldStart("k".into()),
                EventKind::Value(Scalar::from("v")),
                EventKind::End,
                EventKind::FieldStart("b".into()),
                EventKind::ListStart(std::borrow::Cow::Owned(element.clone())),
                EventKind::Value(Scalar::Integer(1)),
                EventKind::Value(Scalar::Integer(2)),
                EventKind::End,
                EventKind::End,
            ]
        );
    }

    #[test]
    fn test_nested_struct_inside_captured_field_is_reordered() {
        let (result, out) = run(&[
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::value(20_i64),
            Event::field_start("a"),
            Event::value(10_i64),
            Event::end(),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(
            kinds(&out),
            vec![
                EventKind::StructStart("T".into()),
                EventKind::FieldStart("a".into()),
                EventKind::Value(Scalar::Integer(1)),
                EventKind::FieldStart("b".into()),
                EventKind::StructStart("T".into()),
                EventKind::FieldStart("a".into()),
                EventKind::Value(Scalar::Integer(10)),
                EventKind::FieldStart("b".into()),
                EventKind::Value(Scalar::Integer(20)),
                EventKind::End,
                EventKind::End,
            ]
        );
    }

    #[test]
    fn test_replayed_fields_keep_their_paths() {
        let tagged = RecordingReactor::new();
        let mut tagged_sink = tagged.clone();
        let mut paths = PathSettingProcessor::new();
        let events = [
            Event::map_start(),
            Event::field_start("outer"),
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::value(2_i64),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
            Event::end(),
        ];
        for event in &events {
            paths.process(event, &mut tagged_sink).unwrap();
        }

        let (result, out) = run(&tagged.events());
        result.unwrap();
        let rendered: Vec<String> = out
            .iter()
            .map(|event| {
                let path = event.path().map(ToString::to_string).unwrap_or_default();
                format!("{} {path}", event.tag())
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                "map start $",
                "field start outer",
                "struct start outer",
                "field start outer.a",
                "value outer.a",
                "field start outer.b",
                "value outer.b",
                "end outer",
                "end $",
            ]
        );
    }

    #[test]
    fn test_unordered_struct_passes_through() {
        let (result, out) = run(&[
            Event::struct_start("Free"),
            Event::field_start("b"),
            Event::value(2_i64),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ]);
        result.unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out[1].kind(), &EventKind::FieldStart("b".into()));
    }

    #[test]
    fn test_wide_struct_in_reverse() {
        let names: Vec<String> = (0..5_000).map(|i| format!("f{i}")).collect();
        let order = Arc::new(
            FieldOrder::new(names.iter().map(FieldSpecification::required)).unwrap(),
        );
        let orders: Arc<dyn OrderGetter> = Arc::new(move |_: &str| Some(Arc::clone(&order)));
        let recorder = RecordingReactor::new();
        let mut sink = recorder.clone();
        let mut processor = FieldOrderProcessor::new(orders);

        processor.process(&Event::struct_start("Wide"), &mut sink).unwrap();
        for name in names.iter().rev() {
            processor.process(&Event::field_start(name.as_str()), &mut sink).unwrap();
            processor.process(&Event::value(true), &mut sink).unwrap();
        }
        processor.process(&Event::end(), &mut sink).unwrap();

        let emitted: Vec<String> = recorder
            .kinds()
            .into_iter()
            .filter_map(|kind| match kind {
                EventKind::FieldStart(name) => Some(name.into_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(emitted, names);
    }
}
