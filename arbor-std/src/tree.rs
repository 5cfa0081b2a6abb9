//! # Generic Trees
//!
//! [`Tree`] is an owned, schema-free value with the same shape as the event
//! model. [`TreeFactory`] rebuilds one from events through a
//! [`BuildReactor`](crate::BuildReactor), and [`Tree::emit`] walks one back
//! into events, so a tree survives `emit -> pipeline -> build` unchanged.

use crate::send::EventSend;
use arbor_core::{
    ArborError, BoxError, Factory, FieldSetBuilder, ListBuilder, ObjectPath, Reactor, Scalar,
    TypeReference,
};

/// An owned tree-shaped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// A leaf.
    Scalar(Scalar<'static>),
    /// An ordered list with its declared element type.
    List {
        /// Declared element type.
        element: TypeReference,
        /// Elements in order.
        items: Vec<Tree>,
    },
    /// An untyped field-set, in field order.
    Map(Vec<(String, Tree)>),
    /// A typed field-set, in field order.
    Struct {
        /// Declared type name.
        type_name: String,
        /// Fields in order.
        fields: Vec<(String, Tree)>,
    },
}

impl Tree {
    /// A leaf.
    pub fn scalar(value: impl Into<Scalar<'static>>) -> Self {
        Tree::Scalar(value.into())
    }

    /// A list of `element`-typed items.
    pub fn list(element: TypeReference, items: impl IntoIterator<Item = Tree>) -> Self {
        Tree::List {
            element,
            items: items.into_iter().collect(),
        }
    }

    /// An untyped field-set.
    pub fn map<K: Into<String>>(fields: impl IntoIterator<Item = (K, Tree)>) -> Self {
        Tree::Map(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// A field-set of type `type_name`.
    pub fn structure<K: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, Tree)>,
    ) -> Self {
        Tree::Struct {
            type_name: type_name.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// The value of field `name`, for maps and structs.
    pub fn get(&self, name: &str) -> Option<&Tree> {
        match self {
            Tree::Map(fields) | Tree::Struct { fields, .. } => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            Tree::Scalar(_) | Tree::List { .. } => None,
        }
    }

    /// Container nesting depth; a scalar has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((tree, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match tree {
                Tree::Scalar(_) => {}
                Tree::List { items, .. } => {
                    deepest = deepest.max(depth + 1);
                    pending.extend(items.iter().map(|item| (item, depth + 1)));
                }
                Tree::Map(fields) | Tree::Struct { fields, .. } => {
                    deepest = deepest.max(depth + 1);
                    pending.extend(fields.iter().map(|(_, value)| (value, depth + 1)));
                }
            }
        }
        deepest
    }

    /// Emits this tree as a well-formed event sequence into `reactor`.
    pub fn emit(&self, reactor: &mut dyn Reactor) -> Result<(), ArborError> {
        enum Step<'t> {
            Visit(&'t Tree),
            Field(&'t str, &'t Tree),
            End,
        }

        let mut send = EventSend::new(reactor);
        let mut steps = vec![Step::Visit(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Tree::Scalar(value)) => send.value(value.reborrow())?,
                Step::Visit(Tree::List { element, items }) => {
                    send.start_list(element)?;
                    steps.push(Step::End);
                    steps.extend(items.iter().rev().map(Step::Visit));
                }
                Step::Visit(Tree::Map(fields)) => {
                    send.start_map()?;
                    steps.push(Step::End);
                    steps.extend(fields.iter().rev().map(|(name, value)| Step::Field(name, value)));
                }
                Step::Visit(Tree::Struct { type_name, fields }) => {
                    send.start_struct(type_name)?;
                    steps.push(Step::End);
                    steps.extend(fields.iter().rev().map(|(name, value)| Step::Field(name, value)));
                }
                Step::Field(name, value) => {
                    send.start_field(name)?;
                    steps.push(Step::Visit(value));
                }
                Step::End => send.end()?,
            }
        }
        Ok(())
    }
}

/// Builds [`Tree`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFactory;

struct TreeFields {
    type_name: Option<String>,
    fields: Vec<(String, Tree)>,
}

struct TreeItems {
    element: TypeReference,
    items: Vec<Tree>,
}

impl Factory<Tree> for TreeFactory {
    fn build_value(&mut self, _path: &ObjectPath, value: &Scalar<'_>) -> Result<Tree, BoxError> {
        Ok(Tree::Scalar(value.clone().into_owned()))
    }

    fn start_map(&mut self, _path: &ObjectPath) -> Result<Box<dyn FieldSetBuilder<Tree>>, BoxError> {
        Ok(Box::new(TreeFields {
            type_name: None,
            fields: Vec::new(),
        }))
    }

    fn start_struct(
        &mut self,
        _path: &ObjectPath,
        type_name: &str,
    ) -> Result<Box<dyn FieldSetBuilder<Tree>>, BoxError> {
        Ok(Box::new(TreeFields {
            type_name: Some(type_name.to_owned()),
            fields: Vec::new(),
        }))
    }

    fn start_list(
        &mut self,
        _path: &ObjectPath,
        element_type: &TypeReference,
    ) -> Result<Box<dyn ListBuilder<Tree>>, BoxError> {
        Ok(Box::new(TreeItems {
            element: element_type.clone(),
            items: Vec::new(),
        }))
    }
}

impl FieldSetBuilder<Tree> for TreeFields {
    fn start_field(
        &mut self,
        _path: &ObjectPath,
        _name: &str,
    ) -> Result<Box<dyn Factory<Tree>>, BoxError> {
        Ok(Box::new(TreeFactory))
    }

    fn set_value(&mut self, _path: &ObjectPath, name: &str, value: Tree) -> Result<(), BoxError> {
        self.fields.push((name.to_owned(), value));
        Ok(())
    }

    fn produce_value(self: Box<Self>, _path: &ObjectPath) -> Result<Tree, BoxError> {
        let TreeFields { type_name, fields } = *self;
        Ok(match type_name {
            Some(type_name) => Tree::Struct { type_name, fields },
            None => Tree::Map(fields),
        })
    }
}

impl ListBuilder<Tree> for TreeItems {
    fn next_factory(&mut self, _path: &ObjectPath) -> Result<Box<dyn Factory<Tree>>, BoxError> {
        Ok(Box::new(TreeFactory))
    }

    fn add_value(&mut self, _path: &ObjectPath, value: Tree) -> Result<(), BoxError> {
        self.items.push(value);
        Ok(())
    }

    fn produce_value(self: Box<Self>, _path: &ObjectPath) -> Result<Tree, BoxError> {
        let TreeItems { element, items } = *self;
        Ok(Tree::List { element, items })
    }
}
