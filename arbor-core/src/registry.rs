//! # Type Registry Collaborators
//!
//! The type registry owns type definitions. Stages only consult it through
//! the two read-only traits below, so any model layer can plug in.

use crate::{field_order::FieldOrder, types::builtin};
use std::sync::Arc;

/// Resolves assignability between named types.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `TypeRegistry`",
    label = "missing `TypeRegistry` implementation",
    note = "Implement `TypeRegistry` (or use `BasicRegistry`) to supply type relationships."
)]
pub trait TypeRegistry: Send + Sync {
    /// Whether a value of type `actual` may stand in for `expected`.
    fn is_subtype(&self, actual: &str, expected: &str) -> bool {
        actual == expected
    }

    /// Whether an untyped field-set may stand in for `expected`.
    fn accepts_map(&self, expected: &str) -> bool {
        expected == builtin::MAP
    }
}

/// A registry that knows only built-in types: names match by equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRegistry;

impl TypeRegistry for BasicRegistry {}

impl<T: TypeRegistry + ?Sized> TypeRegistry for Arc<T> {
    fn is_subtype(&self, actual: &str, expected: &str) -> bool {
        (**self).is_subtype(actual, expected)
    }

    fn accepts_map(&self, expected: &str) -> bool {
        (**self).accepts_map(expected)
    }
}

/// Supplies the declared field order of a struct type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `OrderGetter`",
    label = "missing `OrderGetter` implementation",
    note = "Use a closure `Fn(&str) -> Option<Arc<FieldOrder>>` or a `TypeTable`."
)]
pub trait OrderGetter: Send + Sync {
    /// The field order for `type_name`, or `None` if its fields are not reordered.
    fn field_order(&self, type_name: &str) -> Option<Arc<FieldOrder>>;
}

impl<F> OrderGetter for F
where
    F: Fn(&str) -> Option<Arc<FieldOrder>> + Send + Sync,
{
    fn field_order(&self, type_name: &str) -> Option<Arc<FieldOrder>> {
        self(type_name)
    }
}
