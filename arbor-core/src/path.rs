//! # Structural Paths
//!
//! An [`ObjectPath`] names the location of an event inside the value tree it
//! belongs to, as a sequence of field names and list indices.
//!
//! Paths are persistent: descending into a field or list element allocates a
//! single node that points at its (shared) parent, so extending a path is O(1)
//! and cloning one is an `Arc` increment. Two paths compare equal when their
//! segment sequences are equal, regardless of how they were built.
//!
//! ```text
//! $            root
//! name         field `name` of the root field-set
//! items[3]     fourth element of the list in field `items`
//! items[3].id  field `id` of that element
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One step of an [`ObjectPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field of a map or struct.
    Field(String),
    /// A zero-based list position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// The location of an event relative to the root of a value.
#[derive(Clone, Default)]
pub struct ObjectPath {
    node: Option<Arc<PathNode>>,
}

struct PathNode {
    parent: ObjectPath,
    segment: PathSegment,
    len: usize,
}

impl ObjectPath {
    /// The empty path.
    pub const fn root() -> Self {
        Self { node: None }
    }

    /// Builds a path from root-first segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = PathSegment>,
    {
        segments
            .into_iter()
            .fold(Self::root(), |path, segment| path.child(segment))
    }

    /// Returns `true` for the empty path.
    pub fn is_root(&self) -> bool {
        self.node.is_none()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.node.as_ref().map_or(0, |node| node.len)
    }

    /// Alias for [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Extends this path by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        Self {
            node: Some(Arc::new(PathNode {
                parent: self.clone(),
                segment,
                len: self.len() + 1,
            })),
        }
    }

    /// Descends into a named field.
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Field(name.into()))
    }

    /// Descends into a list element.
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// The path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<&ObjectPath> {
        self.node.as_ref().map(|node| &node.parent)
    }

    /// The last segment, or `None` at the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.node.as_ref().map(|node| &node.segment)
    }

    /// Iterates the segments leaf-first.
    pub fn iter_rev(&self) -> impl Iterator<Item = &PathSegment> {
        let mut cursor = self.node.as_deref();
        std::iter::from_fn(move || {
            let node = cursor?;
            cursor = node.parent.node.as_deref();
            Some(&node.segment)
        })
    }

    /// Collects the segments root-first.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments: Vec<PathSegment> = self.iter_rev().cloned().collect();
        segments.reverse();
        segments
    }
}

// Releases uniquely owned ancestors one at a time so that dropping a deep
// path never recurses.
impl Drop for ObjectPath {
    fn drop(&mut self) {
        let mut next = self.node.take();
        while let Some(node) = next {
            next = Arc::into_inner(node).and_then(|mut node| node.parent.node.take());
        }
    }
}

impl PartialEq for ObjectPath {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut left = self;
        let mut right = other;
        loop {
            match (&left.node, &right.node) {
                (None, None) => return true,
                (Some(a), Some(b)) if Arc::ptr_eq(a, b) => return true,
                (Some(a), Some(b)) => {
                    if a.segment != b.segment {
                        return false;
                    }
                    left = &a.parent;
                    right = &b.parent;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for ObjectPath {}

impl Hash for ObjectPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for segment in self.iter_rev() {
            segment.hash(state);
        }
    }
}

impl FromIterator<PathSegment> for ObjectPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("$");
        }
        for (position, segment) in self.segments().iter().enumerate() {
            if position > 0 && matches!(segment, PathSegment::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectPath({self})")
    }
}

/// Element-path cursor for one open list.
///
/// Each element costs one index increment plus one node allocation; the base
/// path is shared, never rebuilt.
#[derive(Debug, Clone)]
pub struct ListPath {
    base: ObjectPath,
    next: usize,
}

impl ListPath {
    /// A cursor positioned before the first element of the list at `base`.
    pub fn new(base: ObjectPath) -> Self {
        Self { base, next: 0 }
    }

    /// The path of the list itself.
    pub fn base(&self) -> &ObjectPath {
        &self.base
    }

    /// Number of elements seen so far.
    pub fn count(&self) -> usize {
        self.next
    }

    /// Moves to the next element and returns its path.
    pub fn advance(&mut self) -> ObjectPath {
        let path = self.base.index(self.next);
        self.next += 1;
        path
    }
}
