//! Declared canonical field orders for struct types.

use crate::error::FieldOrderError;
use std::collections::HashMap;

/// One declared field: its name and whether it must be present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpecification {
    /// Field identifier.
    pub name: String,
    /// Whether a struct missing this field is rejected.
    pub required: bool,
}

impl FieldSpecification {
    /// A field that must be present.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    /// A field that may be absent.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

/// The canonical emission order of a struct's fields.
///
/// Field names are unique within one order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOrder {
    fields: Vec<FieldSpecification>,
    positions: HashMap<String, usize>,
}

impl FieldOrder {
    /// Builds an order, rejecting duplicate names.
    pub fn new<I>(fields: I) -> Result<Self, FieldOrderError>
    where
        I: IntoIterator<Item = FieldSpecification>,
    {
        let fields: Vec<FieldSpecification> = fields.into_iter().collect();
        let mut positions = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if positions.insert(field.name.clone(), position).is_some() {
                return Err(FieldOrderError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields, positions })
    }

    /// The declared fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpecification> {
        self.fields.iter()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The declaration of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FieldSpecification> {
        self.position(name).and_then(|position| self.fields.get(position))
    }

    /// Declared position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns `true` if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of the required fields, in order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name.as_str())
    }
}

impl<'a> IntoIterator for &'a FieldOrder {
    type Item = &'a FieldSpecification;
    type IntoIter = std::slice::Iter<'a, FieldSpecification>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
