//! Member discovery strategies.
//!
//! A strategy decides which members of a type are mappable. The resolver
//! calls it once per type, when the [`TypeAccessorTable`] is built.
//!
//! - [`PublicMembers`]: public fields, properties and indexers (default).
//! - [`DeclaredMembers`]: everything the type declares.
//! - any `Fn(Type, &TypeRegistry) -> Vec<MemberDescriptor>` closure.
//!
//! [`TypeAccessorTable`]: crate::table::TypeAccessorTable

use alloc::vec::Vec;

use crate::info::{MemberDescriptor, Type};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// MemberDiscovery

/// Enumerates the mappable members of a type, in a stable order.
///
/// # Examples
///
/// A closure is a strategy:
///
/// ```
/// use fm_access::discovery::MemberDiscovery;
/// use fm_access::info::{MemberDescriptor, Type};
/// use fm_access::registry::TypeRegistry;
///
/// let writable_only = |ty: Type, registry: &TypeRegistry| -> Vec<MemberDescriptor> {
///     registry
///         .get(ty.id())
///         .map(|meta| meta.members().iter().filter(|m| !m.is_read_only()).cloned().collect())
///         .unwrap_or_default()
/// };
///
/// let registry = TypeRegistry::new();
/// assert!(writable_only.discover(Type::of::<u8>(), &registry).is_empty());
/// ```
pub trait MemberDiscovery: Send + Sync {
    /// Returns the mappable members of `ty`.
    ///
    /// Types unknown to `registry` have no members.
    fn discover(&self, ty: Type, registry: &TypeRegistry) -> Vec<MemberDescriptor>;
}

impl<F> MemberDiscovery for F
where
    F: Fn(Type, &TypeRegistry) -> Vec<MemberDescriptor> + Send + Sync,
{
    #[inline]
    fn discover(&self, ty: Type, registry: &TypeRegistry) -> Vec<MemberDescriptor> {
        self(ty, registry)
    }
}

// -----------------------------------------------------------------------------
// Built-in strategies

/// Public instance fields and properties, in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMembers;

impl MemberDiscovery for PublicMembers {
    fn discover(&self, ty: Type, registry: &TypeRegistry) -> Vec<MemberDescriptor> {
        let Some(meta) = registry.get(ty.id()) else {
            return Vec::new();
        };
        meta.members()
            .iter()
            .filter(|member| member.is_public())
            .cloned()
            .collect()
    }
}

/// Every declared member, whatever its visibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMembers;

impl MemberDiscovery for DeclaredMembers {
    fn discover(&self, ty: Type, registry: &TypeRegistry) -> Vec<MemberDescriptor> {
        registry
            .get(ty.id())
            .map(|meta| meta.members().to_vec())
            .unwrap_or_default()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DeclaredMembers, MemberDiscovery, PublicMembers};
    use crate::info::{MemberDescriptor, Type, Visibility};
    use crate::registry::{TypeMeta, TypeRegistry};
    use alloc::vec::Vec;

    struct Secretive {
        open: u8,
        hidden: u8,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::empty();
        registry.insert_type_meta(
            TypeMeta::of::<Secretive>()
                .with_member(MemberDescriptor::field::<Secretive, u8>(
                    "open",
                    |s| &s.open,
                    |s| &mut s.open,
                ))
                .with_member(
                    MemberDescriptor::field::<Secretive, u8>(
                        "hidden",
                        |s| &s.hidden,
                        |s| &mut s.hidden,
                    )
                    .with_visibility(Visibility::Private),
                ),
        );
        registry
    }

    fn names(members: &[MemberDescriptor]) -> Vec<&'static str> {
        members.iter().map(MemberDescriptor::name).collect()
    }

    #[test]
    fn builtin_strategies() {
        let registry = registry();
        let ty = Type::of::<Secretive>();

        assert_eq!(names(&PublicMembers.discover(ty, &registry)), ["open"]);
        assert_eq!(names(&DeclaredMembers.discover(ty, &registry)), ["open", "hidden"]);
        assert!(PublicMembers.discover(Type::of::<u64>(), &registry).is_empty());
    }

    #[test]
    fn closure_strategy() {
        let registry = registry();
        let reversed = |ty: Type, registry: &TypeRegistry| {
            let mut members = DeclaredMembers.discover(ty, registry);
            members.reverse();
            members
        };
        assert_eq!(
            names(&reversed.discover(Type::of::<Secretive>(), &registry)),
            ["hidden", "open"]
        );
    }
}
