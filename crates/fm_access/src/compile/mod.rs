//! Turn descriptors into type-erased callables.
//!
//! - [`AccessorCompiler`]: [`MemberDescriptor`] to [`Getter`] / [`Setter`] / [`AccessorPair`].
//! - [`ConstructorCompiler`]: registered constructor to [`CompiledFactory`].
//!
//! Both are stateless. Every name, type and visibility decision is taken
//! while compiling; a compiled callable only performs one `TypeId` check
//! before touching the member.
//!
//! [`MemberDescriptor`]: crate::info::MemberDescriptor

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod constructor;
mod source;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessorCompiler, AccessorPair, Getter, Setter};
pub use constructor::{CompiledFactory, ConstructorCompiler};

pub(crate) use source::{ConstructorSource, FnConstructor};
pub(crate) use source::{FieldSource, MemberSource, PropertySource};
