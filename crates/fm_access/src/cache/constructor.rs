use core::any::TypeId;

use fm_utils::hash::TypeIdHashState;

use crate::AccessError;
use crate::cache::{CacheStats, SnapshotCache};
use crate::compile::{CompiledFactory, ConstructorCompiler};
use crate::info::Type;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ConstructorCache

/// Compiled [`CompiledFactory`]s by type.
///
/// Failures such as [`AccessError::NoDefaultConstructor`] are not cached,
/// every call for such a type compiles again and fails the same way.
#[derive(Debug)]
pub struct ConstructorCache {
    cache: SnapshotCache<TypeId, CompiledFactory, TypeIdHashState>,
}

impl Default for ConstructorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructorCache {
    pub fn new() -> Self {
        Self {
            cache: SnapshotCache::new("constructor"),
        }
    }

    #[inline]
    pub fn get(&self, ty: Type) -> Option<CompiledFactory> {
        self.cache.get(&ty.id())
    }

    /// Returns the factory of `ty`, compiling it from `registry` on first use.
    ///
    /// # Errors
    ///
    /// [`AccessError::NoDefaultConstructor`] if `registry` has no
    /// constructor for `ty`.
    pub fn get_or_compile(
        &self,
        registry: &TypeRegistry,
        ty: Type,
    ) -> Result<CompiledFactory, AccessError> {
        self.cache
            .get_or_create(ty.id(), |_| ConstructorCompiler::compile_constructor(registry, ty))
    }

    /// Returns the factory of `ty`, running `builder` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the builder's error, nothing is cached then.
    #[inline]
    pub fn get_or_create<E>(
        &self,
        ty: Type,
        builder: impl FnOnce(&TypeId) -> Result<CompiledFactory, E>,
    ) -> Result<CompiledFactory, E> {
        self.cache.get_or_create(ty.id(), builder)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ConstructorCache;
    use crate::AccessError;
    use crate::compile::ConstructorCompiler;
    use crate::info::Type;
    use crate::registry::{TypeMeta, TypeRegistry};

    struct Opaque;

    #[test]
    fn factory_is_shared() {
        let registry = TypeRegistry::new();
        let cache = ConstructorCache::new();

        let a = cache.get_or_compile(&registry, Type::of::<u16>()).unwrap();
        let b = cache.get_or_compile(&registry, Type::of::<u16>()).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.create_as::<u16>(), Ok(0));
        assert!(cache.get(Type::of::<u16>()).is_some());
    }

    #[test]
    fn failures_retry() {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(TypeMeta::of::<Opaque>());
        let cache = ConstructorCache::new();

        for _ in 0..2 {
            let err = cache.get_or_compile(&registry, Type::of::<Opaque>()).unwrap_err();
            assert!(matches!(err, AccessError::NoDefaultConstructor { .. }));
        }
        assert!(cache.is_empty());
        assert_eq!(cache.stats().failures, 2);
    }

    #[test]
    fn custom_builder() {
        let registry = TypeRegistry::new();
        let cache = ConstructorCache::new();
        let ty = Type::of::<char>();

        let err = cache.get_or_create(ty, |_| Err("not yet"));
        assert_eq!(err.unwrap_err(), "not yet");
        assert!(cache.get(ty).is_none());

        let built = cache
            .get_or_create(ty, |_| ConstructorCompiler::compile_constructor(&registry, ty))
            .unwrap();
        let again = cache
            .get_or_create::<AccessError>(ty, |_| panic!("a cached factory is never rebuilt"))
            .unwrap();
        assert!(built.ptr_eq(&again));
        assert_eq!(again.create_as::<char>(), Ok('\0'));
        assert_eq!(cache.len(), 1);
    }
}
