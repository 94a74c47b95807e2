//! Ordered (source, target) type key

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lookup and registration key for a mapping from one type to another
///
/// Equality and hashing only look at the two `TypeId`s. The stored type names
/// exist for logs and error messages. Order matters: `(A, B)` and `(B, A)` are
/// different pairs.
#[derive(Clone, Copy)]
pub struct TypePair {
    source: TypeId,
    target: TypeId,
    source_name: &'static str,
    target_name: &'static str,
}

impl TypePair {
    /// Pair for mapping `F` into `T`
    pub fn of<F: 'static, T: 'static>() -> Self {
        Self {
            source: TypeId::of::<F>(),
            target: TypeId::of::<T>(),
            source_name: std::any::type_name::<F>(),
            target_name: std::any::type_name::<T>(),
        }
    }

    pub fn source(&self) -> TypeId {
        self.source
    }

    pub fn target(&self) -> TypeId {
        self.target
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// The pair with source and target swapped
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            source_name: self.target_name,
            target_name: self.source_name,
        }
    }
}

impl PartialEq for TypePair {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl Eq for TypePair {}

impl Hash for TypePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
    }
}

impl fmt::Debug for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypePair({} -> {})", self.source_name, self.target_name)
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source_name, self.target_name)
    }
}
