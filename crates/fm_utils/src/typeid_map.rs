use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::TypeIdHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map with [`TypeId`] as the fixed key type.
///
/// Keys are hashed with [`TypeIdHashState`], which uses the `TypeId` bits
/// directly instead of hashing them again.
///
/// Only the operations the `fm_*` crates need are exposed, so the storage
/// can change without touching callers.
pub struct TypeIdMap<V>(HashMap<TypeId, V, TypeIdHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_utils::TypeIdMap;
    /// let map = TypeIdMap::<i32>::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(TypeIdHashState))
    }

    /// Inserts the value produced by `f` if `type_id` is absent.
    ///
    /// Returns `true` if the value was inserted, `false` if the key already
    /// existed. `f` is only called when the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use fm_utils::TypeIdMap;
    ///
    /// let mut map = TypeIdMap::new();
    /// assert!(map.try_insert(TypeId::of::<u8>(), || "first"));
    /// assert!(!map.try_insert(TypeId::of::<u8>(), || "second"));
    /// assert_eq!(map.get(&TypeId::of::<u8>()), Some(&"first"));
    /// ```
    #[inline]
    pub fn try_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> bool {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => {
                entry.insert(f());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns a reference to the value for `type_id`.
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Inserts a key-value pair, returning the previous value if any.
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    /// Returns `true` if the map contains `type_id`.
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V: Debug> Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Tests
