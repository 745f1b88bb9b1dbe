//! Append-only caches with lock-free reads.
//!
//! - [`SnapshotCache`]: the generic primitive. Readers load an immutable map
//!   snapshot; a miss builds the value outside any lock and publishes it by
//!   swapping in a new snapshot. The first published value for a key wins.
//! - [`MemberAccessorCache`]: `(type, member name)` to [`AccessorPair`].
//! - [`ConstructorCache`]: type to [`CompiledFactory`].
//!
//! Entries are never removed. A cache lives as long as its owner.
//!
//! [`AccessorPair`]: crate::compile::AccessorPair
//! [`CompiledFactory`]: crate::compile::CompiledFactory

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod member;
mod snapshot;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::ConstructorCache;
pub use member::{MemberAccessorCache, MemberKey};
pub use snapshot::{CacheStats, SnapshotCache};
