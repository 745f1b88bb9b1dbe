use alloc::sync::Arc;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use arc_swap::ArcSwap;
use fm_utils::hash::{Equivalent, FixedHashState, HashMap};

// -----------------------------------------------------------------------------
// CacheStats

/// Counters of a [`SnapshotCache`].
///
/// `builds` may exceed `published` when threads race on the same key;
/// the difference is split between `discarded` and `failures`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Builder invocations.
    pub builds: u64,
    /// Values made visible to readers.
    pub published: u64,
    /// Built values dropped because another thread published first.
    pub discarded: u64,
    /// Builder invocations that returned an error.
    pub failures: u64,
}

#[derive(Default)]
struct Counters {
    builds: AtomicU64,
    published: AtomicU64,
    discarded: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self) -> CacheStats {
        CacheStats {
            builds: self.builds.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

// -----------------------------------------------------------------------------
// SnapshotCache

/// A copy-on-write map from `K` to `V`.
///
/// - Reads load the current snapshot and never lock.
/// - A miss runs the builder **outside** any lock, so a slow build never
///   blocks readers or builds of other keys.
/// - Publishing takes a short lock, checks the key again, and either
///   adopts the value another thread published meanwhile (discarding the
///   local one) or swaps in a copy of the map that includes the new entry.
/// - Builder errors are returned to the caller and nothing is stored, so the
///   next call builds again.
///
/// Values are handed out by clone; use cheap handles such as `Arc<_>`.
///
/// # Examples
///
/// ```
/// use fm_access::cache::SnapshotCache;
///
/// let cache = SnapshotCache::<u32, &'static str>::new("example");
///
/// let first = cache.get_or_insert_with(1, |_| "one");
/// let second = cache.get_or_insert_with(1, |_| "uno");
/// assert_eq!((first, second), ("one", "one"));
///
/// let failed = cache.get_or_create(2, |_| Err::<&str, _>("not now"));
/// assert_eq!(failed, Err("not now"));
/// assert!(!cache.contains(&2));
///
/// let stats = cache.stats();
/// assert_eq!((stats.builds, stats.published, stats.failures), (2, 1, 1));
/// ```
pub struct SnapshotCache<K, V, S = FixedHashState> {
    label: &'static str,
    snapshot: ArcSwap<HashMap<K, V, S>>,
    publish: Mutex<()>,
    counters: Counters,
}

impl<K, V, S: Default> SnapshotCache<K, V, S> {
    /// Creates an empty cache. `label` names it in log records.
    #[inline]
    pub fn new(label: &'static str) -> Self {
        Self::with_capacity(label, 0)
    }

    /// Creates an empty cache whose first snapshot has room for `capacity` entries.
    pub fn with_capacity(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            snapshot: ArcSwap::from_pointee(HashMap::with_capacity_and_hasher(
                capacity,
                S::default(),
            )),
            publish: Mutex::new(()),
            counters: Counters::default(),
        }
    }
}

impl<K, V, S> SnapshotCache<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Returns the published value for `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.snapshot.load().get(key).cloned()
    }

    /// Returns `true` if a value is published for `key`.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.snapshot.load().contains_key(key)
    }

    /// Returns the value for `key`, building and publishing it on a miss.
    ///
    /// Concurrent callers may each run `builder`; every caller receives the
    /// single value that was published first.
    ///
    /// # Errors
    ///
    /// Returns the builder's error. Nothing is cached in that case.
    pub fn get_or_create<E>(
        &self,
        key: K,
        builder: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.snapshot.load().get(&key) {
            return Ok(value.clone());
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!("[{}] miss on {:?}, building.", self.label, key);

        Counters::bump(&self.counters.builds);
        match builder(&key) {
            Ok(value) => Ok(self.publish(key, value)),
            Err(err) => {
                Counters::bump(&self.counters.failures);
                Err(err)
            }
        }
    }

    /// Infallible form of [`get_or_create`](Self::get_or_create).
    #[inline]
    pub fn get_or_insert_with(&self, key: K, builder: impl FnOnce(&K) -> V) -> V {
        match self.get_or_create::<core::convert::Infallible>(key, |key| Ok(builder(key))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    fn publish(&self, key: K, value: V) -> V {
        let _guard = self.publish.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.snapshot.load_full();
        if let Some(winner) = current.get(&key) {
            Counters::bump(&self.counters.discarded);
            log::trace!("[{}] lost the race on {:?}, discarding.", self.label, key);
            return winner.clone();
        }

        let mut next =
            HashMap::with_capacity_and_hasher(current.len() + 1, current.hasher().clone());
        next.extend(current.iter().map(|(k, v)| (k.clone(), v.clone())));
        log::debug!("[{}] published {:?}.", self.label, key);
        next.insert(key, value.clone());
        self.snapshot.store(Arc::new(next));

        Counters::bump(&self.counters.published);
        value
    }
}

impl<K, V, S> SnapshotCache<K, V, S> {
    /// Returns the current snapshot.
    ///
    /// The snapshot is immutable; later publications do not show up in it.
    #[inline]
    pub fn snapshot(&self) -> Arc<HashMap<K, V, S>> {
        self.snapshot.load_full()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.counters.load()
    }
}

impl<K, V, S> fmt::Debug for SnapshotCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("label", &self.label)
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
