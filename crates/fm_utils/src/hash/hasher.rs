//! Provide `FixedHasher` and `TypeIdHasher`.
//!
//! `FixedHasher` is `foldhash` with a fixed seed, so a given input always
//! hashes to the same value across runs.
//!
//! `TypeIdHasher` forwards the `u64` written by `TypeId`'s `Hash` impl,
//! `TypeId` is already a high-quality hash and re-hashing it is wasted work.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x7F4A_7C15_9E37_79B9);

/// A hasher whose output depends only on its input.
///
/// A type alias for [`foldhash::fast::FoldHasher`].
pub type FixedHasher = FoldHasher<'static>;

/// [`BuildHasher`] producing [`FixedHasher`]s.
///
/// This is the default hash state of [`HashMap`](crate::hash::HashMap).
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use fm_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("stringField");
/// let b = FixedHashState.hash_one("stringField");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// TypeIdHasher

/// Pass-through hasher for `TypeId` keys.
///
/// `write_u64` stores the value directly. Other writes fold the bytes in,
/// so the hasher stays usable (if weaker) for keys that are not `TypeId`.
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHasher {
    hash: u64,
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash = self.hash.rotate_left(8) ^ (*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// [`BuildHasher`] producing [`TypeIdHasher`]s.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use fm_utils::hash::{HashMap, TypeIdHashState};
///
/// let mut map = HashMap::<TypeId, &str, _>::with_hasher(TypeIdHashState);
/// map.insert(TypeId::of::<u8>(), "u8");
/// assert_eq!(map.get(&TypeId::of::<u8>()), Some(&"u8"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct TypeIdHashState;

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FixedHashState, TypeIdHashState};
    use core::hash::{BuildHasher, Hasher};

    #[test]
    fn fixed_state_is_stable() {
        assert_eq!(FixedHashState.hash_one(42_u32), FixedHashState.hash_one(42_u32));
        assert_ne!(FixedHashState.hash_one("a"), FixedHashState.hash_one("b"));
    }

    #[test]
    fn typeid_hasher_passes_u64_through() {
        let mut hasher = TypeIdHashState.build_hasher();
        hasher.write_u64(0xDEAD_BEEF);
        assert_eq!(hasher.finish(), 0xDEAD_BEEF);
    }
}
