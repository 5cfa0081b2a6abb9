//! # Type References
//!
//! Read-only type descriptions consulted while validating a stream. They are
//! owned by the type registry and shared across the processing of a value.

use crate::{event::EventKind, registry::TypeRegistry};
use std::fmt;
use std::sync::Arc;

/// Names of the built-in atomic types.
pub mod builtin {
    /// Accepts any value.
    pub const ANY: &str = "any";
    /// Effective type of `Scalar::Null`.
    pub const NULL: &str = "null";
    /// UTF-8 text.
    pub const STRING: &str = "string";
    /// Signed 64-bit integer.
    pub const INTEGER: &str = "integer";
    /// 64-bit float.
    pub const FLOAT: &str = "float";
    /// Boolean.
    pub const BOOLEAN: &str = "boolean";
    /// Raw bytes.
    pub const BUFFER: &str = "buffer";
    /// UTC timestamp.
    pub const TIMESTAMP: &str = "timestamp";
    /// Untyped field-set.
    pub const MAP: &str = "map";
}

/// A named restriction of another type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    /// The type being restricted.
    pub base: Arc<TypeReference>,
}

/// Reference to a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    /// A named type, optionally restricting another.
    Atomic {
        /// Qualified type name.
        name: String,
        /// Present when `name` restricts a base type.
        restriction: Option<Restriction>,
    },
    /// A homogeneous list.
    List {
        /// Declared element type.
        element: Arc<TypeReference>,
        /// Whether a list of this type may have no elements.
        allows_empty: bool,
    },
    /// The inner type or null.
    Nullable(Arc<TypeReference>),
    /// Transparent indirection, used for recursive definitions.
    Pointer(Arc<TypeReference>),
}

impl TypeReference {
    /// A plain named type.
    pub fn atomic(name: impl Into<String>) -> Self {
        TypeReference::Atomic {
            name: name.into(),
            restriction: None,
        }
    }

    /// A named restriction of `base`.
    pub fn restricted(name: impl Into<String>, base: TypeReference) -> Self {
        TypeReference::Atomic {
            name: name.into(),
            restriction: Some(Restriction {
                base: Arc::new(base),
            }),
        }
    }

    /// A list that may be empty.
    pub fn list(element: TypeReference) -> Self {
        TypeReference::List {
            element: Arc::new(element),
            allows_empty: true,
        }
    }

    /// A list that must hold at least one element.
    pub fn non_empty_list(element: TypeReference) -> Self {
        TypeReference::List {
            element: Arc::new(element),
            allows_empty: false,
        }
    }

    /// `inner` or null.
    pub fn nullable(inner: TypeReference) -> Self {
        TypeReference::Nullable(Arc::new(inner))
    }

    /// An indirection to `inner`.
    pub fn pointer(inner: TypeReference) -> Self {
        TypeReference::Pointer(Arc::new(inner))
    }

    /// The built-in `any` type.
    pub fn any() -> Self {
        Self::atomic(builtin::ANY)
    }

    /// Strips every leading [`Pointer`](TypeReference::Pointer).
    pub fn unwrap_pointers(&self) -> &TypeReference {
        let mut current = self;
        while let TypeReference::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    /// Strips pointers and restrictions, yielding the type a value is
    /// ultimately compared against. Nullability is preserved.
    pub fn effective(&self) -> &TypeReference {
        let mut current = self.unwrap_pointers();
        while let TypeReference::Atomic {
            restriction: Some(restriction),
            ..
        } = current
        {
            current = restriction.base.unwrap_pointers();
        }
        current
    }

    /// Every layer of this type, outermost first: pointers, restricted
    /// atomics and nullable wrappers, ending with the innermost type.
    fn layers(&self) -> impl Iterator<Item = &TypeReference> {
        let mut cursor = Some(self);
        std::iter::from_fn(move || {
            let current = cursor?;
            cursor = match current {
                TypeReference::Pointer(inner) | TypeReference::Nullable(inner) => {
                    Some(inner.as_ref())
                }
                TypeReference::Atomic {
                    restriction: Some(restriction),
                    ..
                } => Some(restriction.base.as_ref()),
                TypeReference::Atomic { .. } | TypeReference::List { .. } => None,
            };
            Some(current)
        })
    }

    /// Strips pointers, restrictions and nullability at every level.
    pub fn innermost(&self) -> &TypeReference {
        self.layers().last().unwrap_or(self)
    }

    /// Whether null is admitted anywhere along the chain of layers.
    pub fn is_nullable(&self) -> bool {
        self.layers()
            .any(|layer| matches!(layer, TypeReference::Nullable(_)))
    }

    /// Returns `true` if this is the `any` type after unwrapping.
    pub fn is_any(&self) -> bool {
        matches!(self.innermost(), TypeReference::Atomic { name, .. } if name == builtin::ANY)
    }

    /// Checks whether a value of shape `actual` may appear where this type is
    /// expected.
    pub fn accepts(&self, actual: &ValueShape<'_>, registry: &dyn TypeRegistry) -> bool {
        if let ValueShape::Null = actual {
            return self.is_nullable() || self.is_any();
        }

        let by_name = self.layers().any(|layer| match layer {
            TypeReference::Atomic { name, .. } => {
                name == builtin::ANY
                    || match actual {
                        ValueShape::Scalar(actual_name) | ValueShape::Struct(actual_name) => {
                            registry.is_subtype(actual_name, name)
                        }
                        ValueShape::Map => registry.accepts_map(name),
                        ValueShape::List(_) | ValueShape::Null => false,
                    }
            }
            _ => false,
        });
        if by_name {
            return true;
        }

        match (self.innermost(), actual) {
            (TypeReference::List { element, .. }, ValueShape::List(actual_element)) => {
                element.is_any() || element.effective() == actual_element.effective()
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Atomic { name, .. } => f.write_str(name),
            TypeReference::List {
                element,
                allows_empty: true,
            } => write!(f, "list<{element}>"),
            TypeReference::List {
                element,
                allows_empty: false,
            } => write!(f, "list+<{element}>"),
            TypeReference::Nullable(inner) => write!(f, "{inner}?"),
            TypeReference::Pointer(inner) => write!(f, "{inner}"),
        }
    }
}

/// The observable shape of a value-producing event, used for assignability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape<'a> {
    /// A null scalar.
    Null,
    /// A non-null scalar, by effective type name.
    Scalar(&'a str),
    /// A list declared with the given element type.
    List(&'a TypeReference),
    /// An untyped field-set.
    Map,
    /// A field-set with a declared type name.
    Struct(&'a str),
}

impl<'a> ValueShape<'a> {
    /// Shape of a value-producing event, or `None` for `FieldStart` and `End`.
    pub fn of(kind: &'a EventKind<'_>) -> Option<Self> {
        match kind {
            EventKind::Value(scalar) if scalar.is_null() => Some(ValueShape::Null),
            EventKind::Value(scalar) => Some(ValueShape::Scalar(scalar.type_name())),
            EventKind::ListStart(element) => Some(ValueShape::List(element.as_ref())),
            EventKind::MapStart => Some(ValueShape::Map),
            EventKind::StructStart(name) => Some(ValueShape::Struct(name.as_ref())),
            EventKind::FieldStart(_) | EventKind::End => None,
        }
    }
}

impl fmt::Display for ValueShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Null => f.write_str(builtin::NULL),
            ValueShape::Scalar(name) => f.write_str(name),
            ValueShape::List(element) => write!(f, "list<{element}>"),
            ValueShape::Map => f.write_str(builtin::MAP),
            ValueShape::Struct(name) => write!(f, "struct {name}"),
        }
    }
}

/// Expected shape of a top-level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopType {
    /// A single scalar.
    Value,
    /// A list.
    List,
    /// A field-set, typed or not.
    Map,
    /// A field-set with a declared type name.
    Struct,
}

impl TopType {
    /// Whether `kind` may open a top-level value of this shape.
    pub fn admits(self, kind: &EventKind<'_>) -> bool {
        match (self, kind) {
            (TopType::Value, EventKind::Value(_)) => true,
            (TopType::List, EventKind::ListStart(_)) => true,
            (TopType::Map, EventKind::MapStart | EventKind::StructStart(_)) => true,
            (TopType::Struct, EventKind::StructStart(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopType::Value => "value",
            TopType::List => "list",
            TopType::Map => "map",
            TopType::Struct => "struct",
        })
    }
}
