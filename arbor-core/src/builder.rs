//! # Builder Protocol
//!
//! The pluggable protocol a build reactor drives to materialize a target
//! value of type `T` from an event stream. Every call receives the structural
//! path of the event that triggered it.
//!
//! ```text
//! Factory ──build_value──────────────▶ T
//!    │
//!    ├──start_map / start_struct──▶ FieldSetBuilder ──start_field──▶ Factory
//!    │                                 set_value(name, T)
//!    │                                 produce_value ─▶ T
//!    │
//!    └──start_list────────────────▶ ListBuilder ──next_factory──▶ Factory
//!                                      add_value(T)
//!                                      produce_value ─▶ T
//! ```
//!
//! Errors returned by implementations are surfaced unchanged as
//! [`ArborError::Builder`](crate::ArborError::Builder).

use crate::{error::BoxError, event::Scalar, path::ObjectPath, types::TypeReference};

/// Produces the value for one position in the tree.
pub trait Factory<T> {
    /// Converts a scalar into a built value.
    fn build_value(&mut self, path: &ObjectPath, value: &Scalar<'_>) -> Result<T, BoxError>;

    /// Begins an untyped field-set.
    fn start_map(&mut self, path: &ObjectPath) -> Result<Box<dyn FieldSetBuilder<T>>, BoxError>;

    /// Begins a field-set of the named type.
    fn start_struct(
        &mut self,
        path: &ObjectPath,
        type_name: &str,
    ) -> Result<Box<dyn FieldSetBuilder<T>>, BoxError>;

    /// Begins a list.
    fn start_list(
        &mut self,
        path: &ObjectPath,
        element_type: &TypeReference,
    ) -> Result<Box<dyn ListBuilder<T>>, BoxError>;
}

/// Accumulates the fields of one map or struct.
pub trait FieldSetBuilder<T> {
    /// Returns the factory for the value of field `name`.
    fn start_field(&mut self, path: &ObjectPath, name: &str)
    -> Result<Box<dyn Factory<T>>, BoxError>;

    /// Records the completed value of field `name`.
    fn set_value(&mut self, path: &ObjectPath, name: &str, value: T) -> Result<(), BoxError>;

    /// Finalizes the field-set.
    fn produce_value(self: Box<Self>, path: &ObjectPath) -> Result<T, BoxError>;
}

/// Accumulates the elements of one list.
pub trait ListBuilder<T> {
    /// Returns the factory for the next element.
    fn next_factory(&mut self, path: &ObjectPath) -> Result<Box<dyn Factory<T>>, BoxError>;

    /// Records a completed element.
    fn add_value(&mut self, path: &ObjectPath, value: T) -> Result<(), BoxError>;

    /// Finalizes the list.
    fn produce_value(self: Box<Self>, path: &ObjectPath) -> Result<T, BoxError>;
}

impl<T, F: Factory<T> + ?Sized> Factory<T> for Box<F> {
    fn build_value(&mut self, path: &ObjectPath, value: &Scalar<'_>) -> Result<T, BoxError> {
        (**self).build_value(path, value)
    }

    fn start_map(&mut self, path: &ObjectPath) -> Result<Box<dyn FieldSetBuilder<T>>, BoxError> {
        (**self).start_map(path)
    }

    fn start_struct(
        &mut self,
        path: &ObjectPath,
        type_name: &str,
    ) -> Result<Box<dyn FieldSetBuilder<T>>, BoxError> {
        (**self).start_struct(path, type_name)
    }

    fn start_list(
        &mut self,
        path: &ObjectPath,
        element_type: &TypeReference,
    ) -> Result<Box<dyn ListBuilder<T>>, BoxError> {
        (**self).start_list(path, element_type)
    }
}
