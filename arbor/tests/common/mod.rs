#![allow(dead_code)]

use arbor::testing::RecordingReactor;
use arbor::{
    Event, EventKind, FieldOrder, FieldSpecification, Reactor, Scalar, Tree, TypeReference,
    TypeTable, builtin,
};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Model Fixtures
// ============================================================================

/// `Person { name (required), age (required), email (optional) }` and
/// `Team { lead (required), members (required) }`, with `Employee <: Person`.
pub fn model() -> Arc<TypeTable> {
    Arc::new(
        TypeTable::builder()
            .order(
                "Person",
                FieldOrder::new([
                    FieldSpecification::required("name"),
                    FieldSpecification::required("age"),
                    FieldSpecification::optional("email"),
                ])
                .unwrap(),
            )
            .order(
                "Team",
                FieldOrder::new([
                    FieldSpecification::required("lead"),
                    FieldSpecification::required("members"),
                ])
                .unwrap(),
            )
            .order(
                "T",
                FieldOrder::new([
                    FieldSpecification::required("a"),
                    FieldSpecification::required("b"),
                ])
                .unwrap(),
            )
            .subtype("Employee", "Person")
            .map_type("Attributes")
            .build()
            .unwrap(),
    )
}

pub fn person(name: &str, age: i64) -> Tree {
    Tree::structure(
        "Person",
        [
            ("name", Tree::scalar(name.to_string())),
            ("age", Tree::scalar(age)),
        ],
    )
}

// ============================================================================
// Event Helpers
// ============================================================================

/// Feeds `events` in order, stopping at the first error.
pub fn feed(reactor: &mut dyn Reactor, events: &[Event<'_>]) -> Result<(), arbor::ArborError> {
    events.iter().try_for_each(|event| reactor.process(event))
}

/// Collects the events a tree emits.
pub fn events_of(tree: &Tree) -> Vec<Event<'static>> {
    let recorder = RecordingReactor::new();
    let mut sink = recorder.clone();
    tree.emit(&mut sink).unwrap();
    recorder.events()
}

/// Renders recorded events as `"<kind> @ <path>"` lines.
pub fn render(events: &[Event<'static>]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

pub fn kinds(events: &[Event<'static>]) -> Vec<EventKind<'static>> {
    events.iter().map(|event| event.kind().clone()).collect()
}

// ============================================================================
// Strategies
// ============================================================================

pub fn arb_scalar() -> impl Strategy<Value = Scalar<'static>> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::from),
        any::<i64>().prop_map(Scalar::from),
        "[a-z0-9 ]{0,8}".prop_map(Scalar::from),
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Scalar::from),
    ]
}

fn named(values: Vec<Tree>) -> Vec<(String, Tree)> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| (format!("k{i}"), value))
        .collect()
}

/// Arbitrary trees of lists, maps and structs.
pub fn arb_tree() -> impl Strategy<Value = Tree> {
    arb_scalar().prop_map(Tree::Scalar).prop_recursive(8, 96, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| Tree::list(TypeReference::any(), items)),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|values| Tree::Map(named(values))),
            prop::collection::vec(inner, 0..4).prop_map(|values| Tree::Struct {
                type_name: "Node".to_string(),
                fields: named(values),
            }),
        ]
    })
}

/// Lists of maps of scalars, nested `levels` times; depth is `2 * levels + 1`.
pub fn arb_lists_of_maps(levels: u32) -> BoxedStrategy<Tree> {
    let leaf = prop::collection::vec(arb_scalar().prop_map(Tree::Scalar), 1..4)
        .prop_map(|values| Tree::Map(named(values)))
        .boxed();
    (0..levels).fold(leaf, |inner, _| {
        prop::collection::vec(inner, 1..3)
            .prop_map(|maps| {
                Tree::map([(
                    "items",
                    Tree::list(TypeReference::atomic(builtin::MAP), maps),
                )])
            })
            .boxed()
    })
}
