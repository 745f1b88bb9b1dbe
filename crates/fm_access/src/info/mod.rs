//! Static type information consumed by the compilers.
//!
//! ## Menu
//!
//! - [`Type`]: a `TypeId` plus a type path, cheap to copy.
//!     - [`ShortPath`]: the path without module prefixes, for messages.
//! - [`MemberDescriptor`]: one accessible member of a type.
//!     - [`MemberKind`]: `Field`, `Property` or `Indexer`.
//!     - [`Mutability`]: `ReadOnly` or `ReadWrite`.
//!     - [`Visibility`]: `Public` or `Private`.

// -----------------------------------------------------------------------------
// Modules

mod member;
mod type_handle;

// -----------------------------------------------------------------------------
// Exports

pub use member::{MemberDescriptor, MemberKind, Mutability, Visibility};
pub use type_handle::{ShortPath, Type};
