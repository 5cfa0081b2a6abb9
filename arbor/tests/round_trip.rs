mod common;

use arbor::{
    BuildReactor, DomainValue, Pipeline, Reactor, Scalar, StructuralCheck, Tree, TreeFactory,
    TypeReference, builtin,
};
use chrono::{TimeZone, Utc};
use common::{arb_lists_of_maps, arb_tree, events_of, feed, model};
use proptest::prelude::*;
use std::any::Any;
use std::sync::Arc;

fn round_trip(tree: &Tree) -> Tree {
    let mut pipeline = Pipeline::builder()
        .check(StructuralCheck::unconstrained())
        .set_paths()
        .tail(BuildReactor::new(TreeFactory))
        .build();
    tree.emit(&mut pipeline).unwrap();
    pipeline.tail_mut().take_result().unwrap()
}

proptest! {
    #[test]
    fn test_lists_of_maps_survive_round_trip(tree in arb_lists_of_maps(2)) {
        prop_assert!(tree.depth() >= 4);
        prop_assert_eq!(round_trip(&tree), tree);
    }

    #[test]
    fn test_arbitrary_trees_survive_round_trip(tree in arb_tree()) {
        prop_assert_eq!(round_trip(&tree), tree);
    }
}

#[test]
fn test_timestamps_and_buffers_survive_round_trip() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let tree = Tree::map([
        ("at", Tree::scalar(at)),
        ("raw", Tree::scalar(vec![0_u8, 1, 2])),
        ("ratio", Tree::scalar(0.5_f64)),
        (
            "stamps",
            Tree::list(TypeReference::atomic(builtin::TIMESTAMP), [Tree::scalar(at)]),
        ),
    ]);
    assert_eq!(round_trip(&tree), tree);
}

#[derive(Debug, PartialEq)]
struct Money {
    cents: i64,
}

impl DomainValue for Money {
    fn type_name(&self) -> &str {
        "Money"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DomainValue) -> bool {
        other.as_any().downcast_ref::<Money>() == Some(self)
    }
}

#[test]
fn test_domain_values_are_typed_by_their_own_name() {
    let prices = TypeReference::atomic("Money");
    let money = |cents| Tree::scalar(Scalar::Domain(Arc::new(Money { cents })));
    let tree = Tree::list(prices, [money(150), money(99)]);

    let rebuilt = round_trip(&tree);
    assert_eq!(rebuilt, tree);
    assert_ne!(rebuilt, Tree::list(TypeReference::atomic("Money"), [money(150), money(98)]));

    let mut check = StructuralCheck::new(arbor::TopType::List).with_registry(model());
    let strings = TypeReference::atomic(builtin::STRING);
    let err = feed(
        &mut check,
        &[arbor::Event::list_start(&strings), arbor::Event::value(Scalar::Domain(Arc::new(Money { cents: 1 })))],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "list element of type Money is not assignable to string"
    );
}

#[test]
fn test_build_reactor_used_directly() {
    let tree = common::person("Ada", 36);
    let mut build = BuildReactor::new(TreeFactory);
    feed(&mut build, &events_of(&tree)).unwrap();
    assert!(build.is_complete());
    assert_eq!(build.take_result().unwrap(), tree);
    assert!(build.take_result().is_err());
    assert!(build.process(&arbor::Event::end()).is_err());
}
