//! # Path Setting
//!
//! Tags every forwarded event with its [`ObjectPath`], relative to a
//! configurable start path.
//!
//! | Event                         | Path attached                      |
//! |-------------------------------|------------------------------------|
//! | value / container start       | location of that value             |
//! | `FieldStart(f)`               | location of the field's value      |
//! | `End`                         | location of the closed container   |
//!
//! For `StructStart(T) FieldStart(a) ListStart Value(1) Value(2) End End`
//! the two values are tagged `a[0]` and `a[1]`.

use arbor_core::{ArborError, Event, EventKind, ListPath, ObjectPath, Processor, Reactor};

enum Context {
    List(ListPath),
    Map(ObjectPath),
    Field(ObjectPath),
}

impl Context {
    fn path(&self) -> &ObjectPath {
        match self {
            Context::List(list) => list.base(),
            Context::Map(path) | Context::Field(path) => path,
        }
    }
}

/// Computes and attaches the structural path of each event.
pub struct PathSettingProcessor {
    start: ObjectPath,
    stack: Vec<Context>,
}

impl Default for PathSettingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSettingProcessor {
    /// Paths relative to the root.
    pub fn new() -> Self {
        Self::starting_at(ObjectPath::root())
    }

    /// Paths relative to `start`.
    pub fn starting_at(start: ObjectPath) -> Self {
        Self {
            start,
            stack: Vec::new(),
        }
    }

    /// A processor positioned inside the field-set at `path`, expecting a
    /// sequence of `FieldStart`-value pairs.
    pub fn within_field_set(path: ObjectPath) -> Self {
        Self {
            stack: vec![Context::Map(path.clone())],
            start: path,
        }
    }

    /// The configured start path.
    pub fn start(&self) -> &ObjectPath {
        &self.start
    }

    /// Number of open contexts.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Path of a value-producing event in the current context.
    fn value_path(&mut self) -> ObjectPath {
        match self.stack.last_mut() {
            None => self.start.clone(),
            Some(Context::List(list)) => list.advance(),
            Some(context) => context.path().clone(),
        }
    }

    /// Pops the pending field once its value is complete.
    fn complete_value(&mut self) {
        if let Some(Context::Field(_)) = self.stack.last() {
            self.stack.pop();
        }
    }

    fn next_path(&mut self, kind: &EventKind<'_>) -> ObjectPath {
        match kind {
            EventKind::Value(_) => {
                let path = self.value_path();
                self.complete_value();
                path
            }
            EventKind::ListStart(_) => {
                let path = self.value_path();
                self.stack.push(Context::List(ListPath::new(path.clone())));
                path
            }
            EventKind::MapStart | EventKind::StructStart(_) => {
                let path = self.value_path();
                self.stack.push(Context::Map(path.clone()));
                path
            }
            EventKind::FieldStart(name) => {
                let parent = self
                    .stack
                    .last()
                    .map_or(&self.start, Context::path);
                let path = parent.field(name.to_string());
                self.stack.push(Context::Field(path.clone()));
                path
            }
            EventKind::End => {
                let path = match self.stack.pop() {
                    Some(context) => context.path().clone(),
                    None => self.start.clone(),
                };
                self.complete_value();
                path
            }
        }
    }
}

impl Processor for PathSettingProcessor {
    fn process(&mut self, event: &Event<'_>, next: &mut dyn Reactor) -> Result<(), ArborError> {
        let path = self.next_path(event.kind());
        next.process(&event.reborrow().with_path(path))
    }

    fn requires_structural_check(&self) -> bool {
        true
    }
}
