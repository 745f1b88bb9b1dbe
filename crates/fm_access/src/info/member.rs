use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::compile::{FieldSource, MemberSource, PropertySource};
use crate::info::Type;

// -----------------------------------------------------------------------------
// Kinds

/// What a member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A stored field, read and written in place.
    Field,
    /// A value computed by accessor functions.
    Property,
    /// A property that takes an index argument.
    ///
    /// The compilers only produce zero-argument accessors, so indexers
    /// always compile to an empty [`AccessorPair`](crate::compile::AccessorPair).
    Indexer,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.pad("field"),
            Self::Property => f.pad("property"),
            Self::Indexer => f.pad("indexer"),
        }
    }
}

/// Whether a member can be written after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutability {
    ReadOnly,
    ReadWrite,
}

/// Whether a member is part of the type's public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One accessible member of a type.
///
/// A descriptor records the declaring type, the member name, the value type,
/// and the statically typed functions that reach the member. It is built
/// once, usually by [`#[derive(Mappable)]`](crate::derive::Mappable), and
/// handed to [`AccessorCompiler`](crate::compile::AccessorCompiler) to
/// produce type-erased accessors.
///
/// # Examples
///
/// ```
/// use fm_access::info::{MemberDescriptor, MemberKind, Mutability, Type};
///
/// struct Point { x: i32 }
///
/// let x = MemberDescriptor::field::<Point, i32>("x", |p| &p.x, |p| &mut p.x);
///
/// assert_eq!(x.name(), "x");
/// assert_eq!(x.declaring(), Type::of::<Point>());
/// assert_eq!(x.value_type(), Type::of::<i32>());
/// assert_eq!(x.kind(), MemberKind::Field);
/// assert_eq!(x.mutability(), Mutability::ReadWrite);
/// ```
#[derive(Clone)]
pub struct MemberDescriptor {
    declaring: Type,
    name: &'static str,
    value_type: Type,
    kind: MemberKind,
    mutability: Mutability,
    visibility: Visibility,
    // `None` for members no accessor can be compiled for.
    source: Option<Arc<dyn MemberSource>>,
}

impl MemberDescriptor {
    /// A public read-write field of `T` with value type `V`.
    ///
    /// The getter compiled from it returns a clone of the field.
    pub fn field<T: Any, V: Any + Clone>(
        name: &'static str,
        read: fn(&T) -> &V,
        write: fn(&mut T) -> &mut V,
    ) -> Self {
        Self {
            declaring: Type::of::<T>(),
            name,
            value_type: Type::of::<V>(),
            kind: MemberKind::Field,
            mutability: Mutability::ReadWrite,
            visibility: Visibility::Public,
            source: Some(Arc::new(FieldSource::new(read, Some(write)))),
        }
    }

    /// A public field of `T` that can not be written once the instance exists.
    pub fn readonly_field<T: Any, V: Any + Clone>(name: &'static str, read: fn(&T) -> &V) -> Self {
        Self {
            declaring: Type::of::<T>(),
            name,
            value_type: Type::of::<V>(),
            kind: MemberKind::Field,
            mutability: Mutability::ReadOnly,
            visibility: Visibility::Public,
            source: Some(Arc::new(FieldSource::new(read, None))),
        }
    }

    /// A public property of `T`, with an optional get and an optional set function.
    ///
    /// The property is [`Mutability::ReadOnly`] when `set` is `None`.
    pub fn property<T: Any, V: Any>(
        name: &'static str,
        get: Option<fn(&T) -> V>,
        set: Option<fn(&mut T, V)>,
    ) -> Self {
        let mutability = if set.is_some() {
            Mutability::ReadWrite
        } else {
            Mutability::ReadOnly
        };
        Self {
            declaring: Type::of::<T>(),
            name,
            value_type: Type::of::<V>(),
            kind: MemberKind::Property,
            mutability,
            visibility: Visibility::Public,
            source: Some(Arc::new(PropertySource::new(get, set))),
        }
    }

    /// A public indexed property of `T` yielding `V`.
    ///
    /// Recorded so that discovery reports it, but it has no accessor source.
    pub fn indexer<T: Any, V: Any>(name: &'static str) -> Self {
        Self {
            declaring: Type::of::<T>(),
            name,
            value_type: Type::of::<V>(),
            kind: MemberKind::Indexer,
            mutability: Mutability::ReadOnly,
            visibility: Visibility::Public,
            source: None,
        }
    }

    /// Sets the visibility.
    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the member read-only, whatever its source can do.
    #[inline]
    pub fn read_only(mut self) -> Self {
        self.mutability = Mutability::ReadOnly;
        self
    }

    /// Returns the type declaring this member.
    #[inline]
    pub fn declaring(&self) -> Type {
        self.declaring
    }

    /// Returns the member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type of the member's value.
    #[inline]
    pub fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::ReadOnly
    }

    #[inline]
    pub(crate) fn source(&self) -> Option<&dyn MemberSource> {
        self.source.as_deref()
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("declaring", &self.declaring)
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("kind", &self.kind)
            .field("mutability", &self.mutability)
            .field("visibility", &self.visibility)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
