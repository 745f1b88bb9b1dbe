use alloc::sync::Arc;
use core::any::TypeId;

use fm_utils::hash::Equivalent;

use crate::cache::{CacheStats, SnapshotCache};
use crate::compile::{AccessorCompiler, AccessorPair};
use crate::info::{MemberDescriptor, Type};

// -----------------------------------------------------------------------------
// MemberKey

/// Cache key of one member: declaring type and member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey {
    type_id: TypeId,
    name: &'static str,
}

impl MemberKey {
    #[inline]
    pub fn new(ty: Type, name: &'static str) -> Self {
        Self {
            type_id: ty.id(),
            name,
        }
    }

    #[inline]
    pub fn of(member: &MemberDescriptor) -> Self {
        Self::new(member.declaring(), member.name())
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Borrowed form of `MemberKey`, for lookups with a short-lived name.
// Field order and types match `MemberKey` so both hash identically.
#[derive(Hash)]
struct MemberQuery<'a> {
    type_id: TypeId,
    name: &'a str,
}

impl Equivalent<MemberKey> for MemberQuery<'_> {
    #[inline]
    fn equivalent(&self, key: &MemberKey) -> bool {
        self.type_id == key.type_id && self.name == key.name
    }
}

// -----------------------------------------------------------------------------
// MemberAccessorCache

/// Compiled [`AccessorPair`]s by `(declaring type, member name)`.
///
/// A key maps to a single `Arc<AccessorPair>` for the life of the cache,
/// whichever thread compiled it first.
#[derive(Debug)]
pub struct MemberAccessorCache {
    cache: SnapshotCache<MemberKey, Arc<AccessorPair>>,
}

impl Default for MemberAccessorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberAccessorCache {
    pub fn new() -> Self {
        Self {
            cache: SnapshotCache::new("member"),
        }
    }

    /// Returns the cached pair of `ty::name`, without allocating.
    #[inline]
    pub fn get(&self, ty: Type, name: &str) -> Option<Arc<AccessorPair>> {
        self.cache.get(&MemberQuery {
            type_id: ty.id(),
            name,
        })
    }

    /// Returns the pair of `member`, compiling it on first use.
    pub fn get_or_compile(&self, member: &MemberDescriptor) -> Arc<AccessorPair> {
        self.cache
            .get_or_insert_with(MemberKey::of(member), |_| {
                Arc::new(AccessorCompiler::compile(member))
            })
    }

    /// Returns the pair for `key`, running `builder` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the builder's error, nothing is cached then.
    #[inline]
    pub fn get_or_create<E>(
        &self,
        key: MemberKey,
        builder: impl FnOnce(&MemberKey) -> Result<Arc<AccessorPair>, E>,
    ) -> Result<Arc<AccessorPair>, E> {
        self.cache.get_or_create(key, builder)
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
    use super::{MemberAccessorCache, MemberKey};
    use crate::compile::AccessorCompiler;
    use crate::info::{MemberDescriptor, Type};
    use alloc::string::String;
    use alloc::sync::Arc;

    struct User {
        name: String,
    }

    fn name() -> MemberDescriptor {
        MemberDescriptor::field::<User, String>("name", |u| &u.name, |u| &mut u.name)
    }

    #[test]
    fn compiled_once() {
        let cache = MemberAccessorCache::new();
        let first = cache.get_or_compile(&name());
        let second = cache.get_or_compile(&name());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().builds, 1);
    }

    #[test]
    fn borrowed_lookup() {
        let cache = MemberAccessorCache::new();
        assert!(cache.get(Type::of::<User>(), "name").is_none());

        let pair = cache.get_or_compile(&name());
        let query = String::from("name");
        let found = cache.get(Type::of::<User>(), &query).unwrap();
        assert!(Arc::ptr_eq(&pair, &found));

        assert!(cache.get(Type::of::<String>(), "name").is_none());
        assert_eq!(MemberKey::of(&name()), MemberKey::new(Type::of::<User>(), "name"));
    }

    #[test]
    fn custom_builder() {
        let cache = MemberAccessorCache::new();
        let key = MemberKey::of(&name());

        let err = cache.get_or_create(key, |_| Err("not yet"));
        assert_eq!(err.unwrap_err(), "not yet");
        assert!(cache.is_empty());

        let built = cache
            .get_or_create::<()>(key, |_| Ok(Arc::new(AccessorCompiler::compile(&name()))))
            .unwrap();
        let again = cache
            .get_or_create::<()>(key, |_| panic!("a cached pair is never rebuilt"))
            .unwrap();
        assert!(Arc::ptr_eq(&built, &again));
        assert!(Arc::ptr_eq(&built, &cache.get_or_compile(&name())));

        let stats = cache.stats();
        assert_eq!((stats.builds, stats.failures), (2, 1));
    }
}
