mod common;

use arbor::testing::RecordingReactor;
use arbor::{
    ArborError, BuildReactor, Event, EventKind, EventSend, MissingFieldsError, Pipeline, Scalar,
    TopType, Tree, TreeFactory, TypeReference,
};
use common::{events_of, feed, kinds, model, person, render};

fn ordering_pipeline(recorder: &RecordingReactor) -> Pipeline<RecordingReactor> {
    let model = model();
    Pipeline::builder()
        .expect(TopType::Struct)
        .registry(model.clone())
        .set_paths()
        .order_fields(model)
        .tail(recorder.clone())
        .build()
}

#[test]
fn test_fields_are_emitted_in_declared_order() {
    let recorder = RecordingReactor::new();
    let mut pipeline = ordering_pipeline(&recorder);
    feed(
        &mut pipeline,
        &[
            Event::struct_start("T"),
            Event::field_start("b"),
            Event::value(2_i64),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ],
    )
    .unwrap();

    assert_eq!(
        kinds(&recorder.events()),
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
fn test_missing_required_field_is_named() {
    let recorder = RecordingReactor::new();
    let mut pipeline = ordering_pipeline(&recorder);
    let err = feed(
        &mut pipeline,
        &[
            Event::struct_start("T"),
            Event::field_start("a"),
            Event::value(1_i64),
            Event::end(),
        ],
    )
    .unwrap_err();

    match &err {
        ArborError::MissingFields(MissingFieldsError { missing, .. }) => {
            assert_eq!(missing, &vec!["b".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "missing required fields [b] of T at $");
    assert!(
        !recorder
            .kinds()
            .iter()
            .any(|kind| kind == &EventKind::End)
    );
}

#[test]
fn test_optional_field_may_be_absent_or_early() {
    let recorder = RecordingReactor::new();
    let mut pipeline = ordering_pipeline(&recorder);
    let mut send = EventSend::new(&mut pipeline);
    send.start_struct("Person").unwrap();
    send.field("email", "ada@example.com").unwrap();
    send.field("age", 36_i64).unwrap();
    send.field("name", "Ada").unwrap();
    send.end().unwrap();

    assert_eq!(
        render(&recorder.events()),
        vec![
            "struct start Person @ $",
            "field start name @ name",
            r#"value "Ada" @ name"#,
            "field start age @ age",
            "value 36 @ age",
            "field start email @ email",
            r#"value "ada@example.com" @ email"#,
            "end @ $",
        ]
    );
}

#[test]
fn test_undeclared_fields_are_forwarded_immediately() {
    let recorder = RecordingReactor::new();
    let mut pipeline = ordering_pipeline(&recorder);
    let mut send = EventSend::new(&mut pipeline);
    send.start_struct("Person").unwrap();
    send.field("age", 36_i64).unwrap();
    send.field("nickname", "A").unwrap();
    send.field("name", "Ada").unwrap();
    send.end().unwrap();

    let fields: Vec<String> = recorder
        .kinds()
        .into_iter()
        .filter_map(|kind| match kind {
            EventKind::FieldStart(name) => Some(name.into_owned()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec!["nickname", "name", "age"]);
}

#[test]
fn test_captured_subtrees_are_reordered_and_keep_paths() {
    let team = Tree::structure(
        "Team",
        [
            (
                "members",
                Tree::list(
                    TypeReference::atomic("Person"),
                    [
                        Tree::structure(
                            "Person",
                            [("age", Tree::scalar(41_i64)), ("name", Tree::scalar("Grace"))],
                        ),
                        person("Alan", 41),
                    ],
                ),
            ),
            (
                "lead",
                Tree::structure(
                    "Employee",
                    [("age", Tree::scalar(36_i64)), ("name", Tree::scalar("Ada"))],
                ),
            ),
        ],
    );

    let recorder = RecordingReactor::new();
    let mut pipeline = ordering_pipeline(&recorder);
    feed(&mut pipeline, &events_of(&team)).unwrap();

    assert_eq!(
        render(&recorder.events()),
        vec![
            "struct start Team @ $",
            "field start lead @ lead",
            "struct start Employee @ lead",
            "field start age @ lead.age",
            "value 36 @ lead.age",
            "field start name @ lead.name",
            r#"value "Ada" @ lead.name"#,
            "end @ lead",
            "field start members @ members",
            "list start <Person> @ members",
            "struct start Person @ members[0]",
            "field start name @ members[0].name",
            r#"value "Grace" @ members[0].name"#,
            "field start age @ members[0].age",
            "value 41 @ members[0].age",
            "end @ members[0]",
            "struct start Person @ members[1]",
            "field start name @ members[1].name",
            r#"value "Alan" @ members[1].name"#,
            "field start age @ members[1].age",
            "value 41 @ members[1].age",
            "end @ members[1]",
            "end @ members",
            "end @ $",
        ]
    );
}

#[test]
fn test_reordered_stream_builds_canonical_tree() {
    let model = model();
    let mut pipeline = Pipeline::builder()
        .expect(TopType::Struct)
        .set_paths()
        .order_fields(model)
        .tail(BuildReactor::new(TreeFactory))
        .build();
    let shuffled = Tree::structure(
        "Person",
        [("age", Tree::scalar(36_i64)), ("name", Tree::scalar("Ada"))],
    );
    feed(&mut pipeline, &events_of(&shuffled)).unwrap();
    assert_eq!(pipeline.tail_mut().take_result().unwrap(), person("Ada", 36));
}
