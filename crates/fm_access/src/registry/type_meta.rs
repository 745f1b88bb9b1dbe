use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::compile::{ConstructorSource, FnConstructor};
use crate::info::{MemberDescriptor, Type};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime metadata of one type, registered into the [`TypeRegistry`].
///
/// This includes the declared members, in declaration order, and an
/// optional parameterless constructor.
///
/// Usually generated by [`#[derive(Mappable)]`](crate::derive::Mappable)
/// through [`GetTypeMeta`], but it can be assembled by hand.
///
/// # Examples
///
/// ```
/// use fm_access::info::MemberDescriptor;
/// use fm_access::registry::TypeMeta;
///
/// #[derive(Default)]
/// struct Point { x: i32, y: i32 }
///
/// let meta = TypeMeta::of::<Point>()
///     .with_member(MemberDescriptor::field::<Point, i32>("x", |p| &p.x, |p| &mut p.x))
///     .with_member(MemberDescriptor::field::<Point, i32>("y", |p| &p.y, |p| &mut p.y))
///     .with_default::<Point>();
///
/// assert_eq!(meta.members().len(), 2);
/// assert!(meta.member("y").is_some());
/// assert!(meta.has_constructor());
/// ```
#[derive(Clone)]
pub struct TypeMeta {
    ty: Type,
    members: Vec<MemberDescriptor>,
    constructor: Option<Arc<dyn ConstructorSource>>,
}

impl TypeMeta {
    /// Creates an empty [`TypeMeta`] for `T`: no members, no constructor.
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self::with_capacity::<T>(0)
    }

    /// Creates an empty [`TypeMeta`] with room for `capacity` members.
    #[inline]
    pub fn with_capacity<T: Any>(capacity: usize) -> Self {
        Self {
            ty: Type::of::<T>(),
            members: Vec::with_capacity(capacity),
            constructor: None,
        }
    }

    /// Returns the [`Type`].
    #[inline(always)]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    /// Appends a declared member.
    #[inline]
    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.push_member(member);
        self
    }

    /// Appends a declared member.
    ///
    /// Members are kept in insertion order. Neither the name nor the
    /// declaring type is checked here, table building reports conflicts.
    pub fn push_member(&mut self, member: MemberDescriptor) {
        self.members.push(member);
    }

    /// Sets the parameterless constructor.
    ///
    /// `ctor` may be private to the type's module: only the function pointer
    /// is stored.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the type of this meta.
    pub fn with_constructor<T: Any>(mut self, ctor: fn() -> T) -> Self {
        assert!(
            self.ty.is::<T>(),
            "constructor of `{}` registered on `{}`",
            core::any::type_name::<T>(),
            self.ty.path(),
        );
        self.constructor = Some(Arc::new(FnConstructor::new(ctor)));
        self
    }

    /// Uses [`Default::default`] as constructor.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the type of this meta.
    #[inline]
    pub fn with_default<T: Any + Default>(self) -> Self {
        self.with_constructor::<T>(T::default)
    }

    /// Returns the declared members, in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Returns the first declared member named `name`.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|member| member.name() == name)
    }

    #[inline]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    #[inline]
    pub(crate) fn constructor_source(&self) -> Option<&dyn ConstructorSource> {
        self.constructor.as_deref()
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("members", &self.members)
            .field("has_constructor", &self.has_constructor())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// A type which can generate its [`TypeMeta`] for registration into the
/// [`TypeRegistry`].
///
/// Implemented by [`#[derive(Mappable)]`](crate::derive::Mappable):
///
/// ```
/// use fm_access::derive::Mappable;
/// use fm_access::registry::GetTypeMeta;
///
/// #[derive(Mappable, Default)]
/// #[mappable(default)]
/// struct A { pub value: u32 }
///
/// let meta = A::get_type_meta();
/// assert!(meta.member("value").is_some());
/// ```
///
/// ## Manually
///
/// ```
/// use fm_access::info::MemberDescriptor;
/// use fm_access::registry::{GetTypeMeta, TypeMeta};
///
/// struct A { value: u32 }
///
/// impl GetTypeMeta for A {
///     fn get_type_meta() -> TypeMeta {
///         TypeMeta::of::<Self>()
///             .with_member(MemberDescriptor::field::<Self, u32>(
///                 "value",
///                 |a| &a.value,
///                 |a| &mut a.value,
///             ))
///             .with_constructor(|| A { value: 1 })
///     }
/// }
///
/// assert!(A::get_type_meta().has_constructor());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeMeta` so cannot provide type registration information",
    note = "consider annotating `{Self}` with `#[derive(Mappable)]`"
)]
pub trait GetTypeMeta: Any {
    /// Returns the [`TypeMeta`] for this type.
    fn get_type_meta() -> TypeMeta;

    /// Registers other types needed by this type.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

// -----------------------------------------------------------------------------
// Tests
