use alloc::string::String;
use core::any::TypeId;

use fm_utils::TypeIdMap;
use fm_utils::hash::{FixedHashState, HashMap};

use crate::registry::{GetTypeMeta, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The owned store of [`TypeMeta`]s.
///
/// This is the only place member descriptors and constructors come from.
/// [Registering] a type stores the [`TypeMeta`] produced by its
/// [`GetTypeMeta`] implementation.
///
/// A registry is built up front and then shared read-only, usually behind
/// an `Arc` inside an [`AccessorResolver`](crate::table::AccessorResolver).
///
/// # Examples
///
/// ```
/// use fm_access::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let meta = registry.get_with_type_path("alloc::string::String").unwrap();
/// assert!(meta.ty().is::<String>());
/// assert!(meta.has_constructor());
/// ```
///
/// [Registering]: TypeRegistry::register
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Creates a registry with the primitive value types registered.
    ///
    /// Each of them is constructible and yields its zero value.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    // The type must not be registered yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
    ) {
        let ty = type_meta.ty();
        type_path_to_id.insert(ty.path(), ty.id());
    }

    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(&meta, &mut self.type_path_to_id);
            meta
        })
    }

    /// Inserts `type_meta` unless its type is already registered.
    ///
    /// Returns `true` if it was inserted. Dependencies are not registered.
    pub fn try_insert_type_meta(&mut self, type_meta: TypeMeta) -> bool {
        self.register_internal(type_meta.type_id(), || type_meta)
    }

    /// Inserts `type_meta`, **overwriting** any previous registration.
    ///
    /// Overwriting only affects resolvers created afterwards: a resolver
    /// never reads a type's meta again once its table or constructor is
    /// cached. Dependencies are not registered.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        if !self.type_meta_table.contains(&type_meta.type_id()) {
            Self::add_new_type_indices(&type_meta, &mut self.type_path_to_id);
        }
        self.type_meta_table.insert(type_meta.type_id(), type_meta);
    }

    /// Registers `T` if it has not been registered yet.
    ///
    /// The first registration wins. On success the dependencies reported by
    /// [`GetTypeMeta::register_dependencies`] are registered too.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use fm_access::derive::Mappable;
    /// use fm_access::registry::TypeRegistry;
    ///
    /// #[derive(Mappable)]
    /// struct Foo {
    ///     pub name: String,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<Foo>();
    ///
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// assert!(!registry.get(TypeId::of::<Foo>()).unwrap().has_constructor());
    /// ```
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Registers every type derived with `#[mappable(auto_register)]`.
    ///
    /// Equivalent to calling [`register`](Self::register) for each of them.
    /// Generic types are never auto-registered. Repeated calls are cheap.
    ///
    /// ## Return Value
    ///
    /// `true` if static registration works on the current platform.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature, without it this does nothing
    /// and returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core::any::TypeId;
    /// use fm_access::derive::Mappable;
    /// use fm_access::registry::TypeRegistry;
    ///
    /// #[derive(Mappable, Default)]
    /// #[mappable(default, auto_register)]
    /// struct Foo {
    ///     pub value: i32,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains(TypeId::of::<Foo>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            if self.contains(TypeId::of::<auto_register::__AvailFlag>()) {
                return true;
            }
            auto_register::__register_types(self);
            self.contains(TypeId::of::<auto_register::__AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Whether the type with the given [`TypeId`] is registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns the [`TypeMeta`] of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns the [`TypeMeta`] of the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    /// Returns an iterator over the registered [`TypeMeta`]s, in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
