//! # Type Tables
//!
//! [`TypeTable`] is a map-backed model layer: it answers both collaborator
//! questions the standard stages ask, field orders ([`OrderGetter`]) and
//! subtyping ([`TypeRegistry`]).
//!
//! ```rust
//! use arbor_core::{FieldOrder, FieldSpecification, OrderGetter, TypeRegistry};
//! use arbor_std::TypeTable;
//!
//! let table = TypeTable::builder()
//!     .order("Point", FieldOrder::new([
//!         FieldSpecification::required("x"),
//!         FieldSpecification::required("y"),
//!     ])?)
//!     .subtype("Point3", "Point")
//!     .build()?;
//!
//! assert!(table.field_order("Point").is_some());
//! assert!(table.is_subtype("Point3", "Point"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use arbor_core::{FieldOrder, OrderGetter, TypeRegistry, builtin};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;

/// Invalid type table declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeTableError {
    /// Two field orders were registered for one type.
    #[error("field order for `{0}` is declared more than once")]
    DuplicateOrder(String),

    /// A type was declared its own supertype.
    #[error("type `{0}` cannot be its own supertype")]
    SelfSubtype(String),
}

/// Field orders and subtype relations keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    orders: HashMap<String, Arc<FieldOrder>>,
    supertypes: HashMap<String, Vec<String>>,
    map_types: HashSet<String>,
}

impl TypeTable {
    /// Create a new type table builder.
    pub fn builder() -> TypeTableBuilder {
        TypeTableBuilder::new()
    }

    /// Number of types with a declared field order.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl OrderGetter for TypeTable {
    fn field_order(&self, type_name: &str) -> Option<Arc<FieldOrder>> {
        self.orders.get(type_name).cloned()
    }
}

impl TypeRegistry for TypeTable {
    fn is_subtype(&self, actual: &str, expected: &str) -> bool {
        if actual == expected {
            return true;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([actual]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self.supertypes.get(current).into_iter().flatten() {
                if parent == expected {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }

    fn accepts_map(&self, expected: &str) -> bool {
        expected == builtin::MAP || self.map_types.contains(expected)
    }
}

/// Builder for constructing a [`TypeTable`].
#[derive(Debug, Default)]
pub struct TypeTableBuilder {
    orders: Vec<(String, FieldOrder)>,
    subtypes: Vec<(String, String)>,
    map_types: HashSet<String>,
}

impl TypeTableBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the canonical field order of `type_name`.
    pub fn order(mut self, type_name: impl Into<String>, order: FieldOrder) -> Self {
        self.orders.push((type_name.into(), order));
        self
    }

    /// Declare `child` a direct subtype of `parent`.
    pub fn subtype(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.subtypes.push((child.into(), parent.into()));
        self
    }

    /// Let untyped maps stand where `type_name` is expected.
    pub fn map_type(mut self, type_name: impl Into<String>) -> Self {
        self.map_types.insert(type_name.into());
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<TypeTable, TypeTableError> {
        let mut orders = HashMap::with_capacity(self.orders.len());
        for (name, order) in self.orders {
            if orders.contains_key(&name) {
                return Err(TypeTableError::DuplicateOrder(name));
            }
            orders.insert(name, Arc::new(order));
        }
        let mut supertypes: HashMap<String, Vec<String>> = HashMap::new();
        for (child, parent) in self.subtypes {
            if child == parent {
                return Err(TypeTableError::SelfSubtype(child));
            }
            supertypes.entry(child).or_default().push(parent);
        }
        Ok(TypeTable {
            orders,
            supertypes,
            map_types: self.map_types,
        })
    }
}
