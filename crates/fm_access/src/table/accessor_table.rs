use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use fm_utils::hash::{FixedHashState, HashMap};

use crate::cache::MemberAccessorCache;
use crate::compile::AccessorPair;
use crate::info::{MemberDescriptor, Type};

// -----------------------------------------------------------------------------
// TypeAccessorTable

/// The accessors of one type, by member name.
///
/// Members keep the order the discovery strategy returned them in.
/// A table is immutable once built and is shared as `Arc<TypeAccessorTable>`.
pub struct TypeAccessorTable {
    ty: Type,
    members: Vec<Arc<AccessorPair>>,
    index: HashMap<&'static str, usize>,
}

impl TypeAccessorTable {
    /// Builds the table of `ty` from discovered `members`.
    ///
    /// Pairs come from `cache`, so a member shared by several tables has a
    /// single compiled pair. Duplicate names keep the first occurrence;
    /// members declared on another type are skipped.
    pub(crate) fn build(
        ty: Type,
        members: &[MemberDescriptor],
        cache: &MemberAccessorCache,
    ) -> Self {
        let mut table = Self {
            ty,
            members: Vec::with_capacity(members.len()),
            index: HashMap::with_capacity_and_hasher(members.len(), FixedHashState),
        };

        for member in members {
            if member.declaring() != ty {
                log::warn!(
                    "Member `{}` is declared on `{}`, not on `{}`; skipped.",
                    member.name(),
                    member.declaring().path(),
                    ty.path(),
                );
                continue;
            }
            if table.index.contains_key(member.name()) {
                log::warn!(
                    "Duplicate member `{}` on `{}`; the first one is kept.",
                    member.name(),
                    ty.path(),
                );
                continue;
            }
            table.index.insert(member.name(), table.members.len());
            table.members.push(cache.get_or_compile(member));
        }

        table
    }

    /// Returns the type the table belongs to.
    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Returns the accessor pair of the member named `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Arc<AccessorPair>> {
        self.index.get(name).map(|&index| &self.members[index])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates the pairs in discovery order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<AccessorPair>> {
        self.members.iter()
    }

    /// Iterates the member names in discovery order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.members.iter().map(|pair| pair.name())
    }
}

impl fmt::Debug for TypeAccessorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeAccessorTable")
            .field("ty", &self.ty)
            .field("members", &self.members)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeAccessorTable;
    use crate::cache::MemberAccessorCache;
    use crate::info::{MemberDescriptor, Type};
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    struct Left {
        a: u8,
        b: u8,
    }

    struct Right {
        a: u8,
    }

    #[test]
    fn first_duplicate_wins_and_foreign_members_are_skipped() {
        let cache = MemberAccessorCache::new();
        let members = [
            MemberDescriptor::field::<Left, u8>("a", |l| &l.a, |l| &mut l.a),
            MemberDescriptor::readonly_field::<Left, u8>("a", |l| &l.b),
            MemberDescriptor::field::<Right, u8>("a", |r| &r.a, |r| &mut r.a),
            MemberDescriptor::readonly_field::<Left, u8>("b", |l| &l.b),
        ];

        let table = TypeAccessorTable::build(Type::of::<Left>(), &members, &cache);

        assert_eq!(table.names().collect::<Vec<_>>(), ["a", "b"]);
        assert!(table.get("a").unwrap().can_write());
        assert!(!table.get("b").unwrap().can_write());
        assert!(!table.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn pairs_are_shared_between_tables() {
        let cache = MemberAccessorCache::new();
        let members = [MemberDescriptor::field::<Right, u8>("a", |r| &r.a, |r| &mut r.a)];

        let one = TypeAccessorTable::build(Type::of::<Right>(), &members, &cache);
        let two = TypeAccessorTable::build(Type::of::<Right>(), &members, &cache);
        assert!(Arc::ptr_eq(one.get("a").unwrap(), two.get("a").unwrap()));
    }
}
