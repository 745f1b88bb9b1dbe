use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use fm_utils::hash::TypeIdHashState;

use crate::AccessError;
use crate::cache::{CacheStats, ConstructorCache, MemberAccessorCache, SnapshotCache};
use crate::compile::{AccessorPair, CompiledFactory};
use crate::discovery::{MemberDiscovery, PublicMembers};
use crate::info::Type;
use crate::registry::TypeRegistry;
use crate::table::TypeAccessorTable;

// -----------------------------------------------------------------------------
// ResolverStats

/// Counters of the caches owned by an [`AccessorResolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub tables: CacheStats,
    pub members: CacheStats,
    pub constructors: CacheStats,
}

// -----------------------------------------------------------------------------
// AccessorResolver

/// Entry point of the crate: resolves accessor tables and constructs
/// instances, compiling each thing once.
///
/// A resolver owns an immutable [`TypeRegistry`], a [`MemberDiscovery`]
/// strategy and three caches (tables, member pairs, constructors). Cached
/// values live as long as the resolver; share it behind an `Arc` to keep
/// them for the whole process. All methods take `&self` and may be called
/// from any thread.
///
/// # Examples
///
/// ```
/// use fm_access::info::{MemberDescriptor, Type};
/// use fm_access::registry::{TypeMeta, TypeRegistry};
/// use fm_access::table::AccessorResolver;
///
/// #[derive(Default)]
/// struct Point { x: i32 }
///
/// let mut registry = TypeRegistry::new();
/// registry.insert_type_meta(
///     TypeMeta::of::<Point>()
///         .with_member(MemberDescriptor::field::<Point, i32>("x", |p| &p.x, |p| &mut p.x))
///         .with_default::<Point>(),
/// );
///
/// let resolver = AccessorResolver::new(registry);
/// let table = resolver.resolve_accessor_table(Type::of::<Point>()).unwrap();
/// let x = resolver.get_accessor(&table, "x").unwrap();
///
/// let mut point = resolver.construct(Type::of::<Point>()).unwrap();
/// x.setter().unwrap().set_value(point.as_mut(), 5_i32).unwrap();
/// assert_eq!(x.getter().unwrap().get_as::<i32>(point.as_ref()).unwrap(), 5);
///
/// assert!(resolver.resolve_accessor_table(Type::OBJECT).is_none());
/// ```
pub struct AccessorResolver {
    registry: Arc<TypeRegistry>,
    discovery: Box<dyn MemberDiscovery>,
    tables: SnapshotCache<TypeId, Arc<TypeAccessorTable>, TypeIdHashState>,
    members: MemberAccessorCache,
    constructors: ConstructorCache,
}

impl AccessorResolver {
    /// Creates a resolver that maps public members.
    #[inline]
    pub fn new(registry: impl Into<Arc<TypeRegistry>>) -> Self {
        Self::builder(registry).build()
    }

    /// Returns a builder to configure the resolver.
    #[inline]
    pub fn builder(registry: impl Into<Arc<TypeRegistry>>) -> AccessorResolverBuilder {
        AccessorResolverBuilder {
            registry: registry.into(),
            discovery: Box::new(PublicMembers),
            table_capacity: 0,
        }
    }

    /// Returns the accessor table of `ty`, building it on first request.
    ///
    /// Returns `None` for [`Type::OBJECT`]: the root type has nothing to map.
    /// Types without registered members yield an empty table.
    pub fn resolve_accessor_table(&self, ty: Type) -> Option<Arc<TypeAccessorTable>> {
        if ty.is_object() {
            return None;
        }
        let table = self.tables.get_or_insert_with(ty.id(), |_| {
            let members = self.discovery.discover(ty, &self.registry);
            let table = TypeAccessorTable::build(ty, &members, &self.members);
            log::debug!("Built accessor table of `{}` with {} members.", ty.path(), table.len());
            Arc::new(table)
        });
        Some(table)
    }

    /// Typed form of [`resolve_accessor_table`](Self::resolve_accessor_table).
    #[inline]
    pub fn resolve<T: Any>(&self) -> Option<Arc<TypeAccessorTable>> {
        self.resolve_accessor_table(Type::of::<T>())
    }

    /// Returns the pair of the member named `name` in `table`.
    ///
    /// `None` means the member is not mappable; an unsupported direction of a
    /// mappable member is an absent side of the returned pair.
    #[inline]
    pub fn get_accessor(&self, table: &TypeAccessorTable, name: &str) -> Option<Arc<AccessorPair>> {
        table.get(name).cloned()
    }

    /// Resolves the table of `ty` and returns the pair named `name`.
    pub fn accessor(&self, ty: Type, name: &str) -> Option<Arc<AccessorPair>> {
        let table = self.resolve_accessor_table(ty)?;
        self.get_accessor(&table, name)
    }

    /// Returns the compiled parameterless constructor of `ty`.
    ///
    /// # Errors
    ///
    /// [`AccessError::NoDefaultConstructor`] if none is registered. The
    /// failure is not cached, fixing the registry is not possible through
    /// a live resolver, so a retry fails the same way.
    #[inline]
    pub fn constructor(&self, ty: Type) -> Result<CompiledFactory, AccessError> {
        self.constructors.get_or_compile(&self.registry, ty)
    }

    /// Creates a new instance of `ty` with its parameterless constructor.
    ///
    /// # Errors
    ///
    /// See [`constructor`](Self::constructor).
    #[inline]
    pub fn construct(&self, ty: Type) -> Result<Box<dyn Any>, AccessError> {
        Ok(self.constructor(ty)?.create())
    }

    /// Typed form of [`construct`](Self::construct).
    ///
    /// # Errors
    ///
    /// See [`constructor`](Self::constructor).
    pub fn construct_as<T: Any>(&self) -> Result<T, AccessError> {
        self.constructor(Type::of::<T>())?.create_as::<T>()
    }

    /// Returns the registry the resolver reads from.
    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the counters of every owned cache.
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            tables: self.tables.stats(),
            members: self.members.stats(),
            constructors: self.constructors.stats(),
        }
    }
}

impl fmt::Debug for AccessorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorResolver")
            .field("registry", &self.registry)
            .field("tables", &self.tables)
            .field("members", &self.members)
            .field("constructors", &self.constructors)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// AccessorResolverBuilder

/// Configures an [`AccessorResolver`].
///
/// ```
/// use fm_access::discovery::DeclaredMembers;
/// use fm_access::registry::TypeRegistry;
/// use fm_access::table::AccessorResolver;
///
/// let resolver = AccessorResolver::builder(TypeRegistry::new())
///     .discovery(DeclaredMembers)
///     .table_capacity(64)
///     .build();
/// # let _ = resolver;
/// ```
pub struct AccessorResolverBuilder {
    registry: Arc<TypeRegistry>,
    discovery: Box<dyn MemberDiscovery>,
    table_capacity: usize,
}

impl AccessorResolverBuilder {
    /// Sets the member discovery strategy, [`PublicMembers`] by default.
    pub fn discovery(mut self, discovery: impl MemberDiscovery + 'static) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    /// Number of types the table cache has room for before it grows.
    pub fn table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    pub fn build(self) -> AccessorResolver {
        AccessorResolver {
            registry: self.registry,
            discovery: self.discovery,
            tables: SnapshotCache::with_capacity("table", self.table_capacity),
            members: MemberAccessorCache::new(),
            constructors: ConstructorCache::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::AccessorResolver;
    use crate::discovery::{DeclaredMembers, MemberDiscovery};
    use crate::info::{MemberDescriptor, Type, Visibility};
    use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};
    use crate::{AccessError, MismatchTarget};
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::sync::Barrier;
    use std::thread;

    #[derive(Default)]
    struct Sample {
        field: String,
        prop_value: String,
    }

    impl Sample {
        fn prop(&self) -> String {
            self.prop_value.clone()
        }

        fn set_prop(&mut self, value: String) {
            self.prop_value = value;
        }
    }

    impl GetTypeMeta for Sample {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>()
                .with_member(MemberDescriptor::field::<Self, String>(
                    "field",
                    |s| &s.field,
                    |s| &mut s.field,
                ))
                .with_member(
                    MemberDescriptor::field::<Self, String>(
                        "prop_value",
                        |s| &s.prop_value,
                        |s| &mut s.prop_value,
                    )
                    .with_visibility(Visibility::Private),
                )
                .with_member(MemberDescriptor::property::<Self, String>(
                    "prop",
                    Some(Self::prop),
                    Some(Self::set_prop),
                ))
                .with_default::<Self>()
        }
    }

    struct Frozen {
        id: u32,
    }

    impl Frozen {
        // Only reachable through the registry.
        fn new() -> Self {
            Self { id: 9 }
        }
    }

    impl GetTypeMeta for Frozen {
        fn get_type_meta() -> TypeMeta {
            TypeMeta::of::<Self>()
                .with_member(MemberDescriptor::readonly_field::<Self, u32>("id", |f| &f.id))
                .with_constructor(Self::new)
        }
    }

    struct NoCtor;

    fn resolver() -> AccessorResolver {
        let mut registry = TypeRegistry::new();
        registry.register::<Sample>();
        registry.register::<Frozen>();
        registry.insert_type_meta(TypeMeta::of::<NoCtor>());
        AccessorResolver::new(registry)
    }

    #[test]
    fn sample_round_trip() {
        let resolver = resolver();
        let table = resolver.resolve::<Sample>().unwrap();

        assert_eq!(table.names().collect::<Vec<_>>(), ["field", "prop"]);
        assert!(table.iter().all(|pair| pair.can_read() && pair.can_write()));

        let mut instance = resolver.construct(Type::of::<Sample>()).unwrap();
        let field = resolver.get_accessor(&table, "field").unwrap();
        field
            .setter()
            .unwrap()
            .set(instance.as_mut(), Box::new(String::from("x")))
            .unwrap();
        let value = field.getter().unwrap().get(instance.as_ref()).unwrap();
        assert_eq!(*value.downcast::<String>().unwrap(), "x");

        let prop = resolver.accessor(Type::of::<Sample>(), "prop").unwrap();
        prop.setter().unwrap().set_value(instance.as_mut(), String::from("y")).unwrap();
        let sample = instance.downcast::<Sample>().unwrap();
        assert_eq!(sample.prop_value, "y");
    }

    #[test]
    fn tables_and_pairs_are_identical() {
        let resolver = resolver();
        let one = resolver.resolve::<Sample>().unwrap();
        let two = resolver.resolve_accessor_table(Type::of::<Sample>()).unwrap();

        assert!(Arc::ptr_eq(&one, &two));
        for name in one.names() {
            assert!(Arc::ptr_eq(one.get(name).unwrap(), two.get(name).unwrap()));
        }
        assert_eq!(resolver.stats().tables.builds, 1);
    }

    #[test]
    fn concurrent_first_resolution() {
        const THREADS: usize = 16;
        let resolver = resolver();
        let barrier = Barrier::new(THREADS);

        let tables: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        resolver.resolve::<Sample>().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &tables[0];
        assert!(tables.iter().all(|table| Arc::ptr_eq(table, first)));

        let stats = resolver.stats();
        assert_eq!(stats.tables.published, 1);
        assert_eq!(stats.tables.builds, 1 + stats.tables.discarded);
        // Losing builds reuse member pairs, each member is published once.
        assert_eq!(stats.members.published, 2);
    }

    #[test]
    fn read_only_member_has_no_setter() {
        let resolver = resolver();
        let id = resolver.accessor(Type::of::<Frozen>(), "id").unwrap();
        assert!(id.setter().is_none());

        let frozen = resolver.construct_as::<Frozen>().unwrap();
        assert_eq!(id.getter().unwrap().get_as::<u32>(&frozen), Ok(9));
    }

    #[test]
    fn missing_constructor_is_deterministic() {
        let resolver = resolver();
        let expected = AccessError::NoDefaultConstructor {
            type_path: Type::of::<NoCtor>().path(),
        };

        assert_eq!(resolver.construct(Type::of::<NoCtor>()).unwrap_err(), expected);
        assert_eq!(resolver.construct(Type::of::<NoCtor>()).unwrap_err(), expected);
        assert_eq!(resolver.stats().constructors.published, 0);

        // Unregistered types fail the same way.
        assert!(matches!(
            resolver.construct_as::<Vec<u8>>(),
            Err(AccessError::NoDefaultConstructor { .. })
        ));
    }

    #[test]
    fn value_types_construct_to_zero() {
        let resolver = resolver();
        assert_eq!(resolver.construct_as::<i64>(), Ok(0));
        assert_eq!(resolver.construct_as::<bool>(), Ok(false));
        assert_eq!(resolver.construct_as::<String>().unwrap(), "");
    }

    #[test]
    fn object_and_unknown_types() {
        let resolver = resolver();
        assert!(resolver.resolve_accessor_table(Type::OBJECT).is_none());
        assert!(resolver.accessor(Type::OBJECT, "field").is_none());

        let empty = resolver.resolve::<Vec<u8>>().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn mismatched_values_do_not_invalidate() {
        let resolver = resolver();
        let field = resolver.accessor(Type::of::<Sample>(), "field").unwrap();
        let setter = field.setter().unwrap();
        let mut sample = Sample::default();

        let err = setter.set_value(&mut sample, 3_i32).unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { target: MismatchTarget::Value, .. }));

        setter.set_value(&mut sample, String::from("ok")).unwrap();
        assert_eq!(sample.field, "ok");
    }

    #[test]
    fn custom_discovery() {
        let mut registry = TypeRegistry::new();
        registry.register::<Sample>();

        let declared = AccessorResolver::builder(registry).discovery(DeclaredMembers).build();
        let table = declared.resolve::<Sample>().unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), ["field", "prop_value", "prop"]);

        let registry = Arc::clone(declared.registry());
        let only_field = AccessorResolver::builder(registry)
            .discovery(|ty: Type, registry: &TypeRegistry| {
                DeclaredMembers
                    .discover(ty, registry)
                    .into_iter()
                    .filter(|member| member.name() == "field")
                    .collect::<Vec<_>>()
            })
            .build();
        assert_eq!(only_field.resolve::<Sample>().unwrap().len(), 1);
    }
}
