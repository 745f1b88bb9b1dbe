//! Per-type accessor tables and the resolver that owns every cache.
//!
//! Most callers only need [`AccessorResolver`]:
//!
//! - [`resolve_accessor_table`](AccessorResolver::resolve_accessor_table)
//! - [`get_accessor`](AccessorResolver::get_accessor)
//! - [`construct`](AccessorResolver::construct)

// -----------------------------------------------------------------------------
// Modules

mod accessor_table;
mod resolver;

// -----------------------------------------------------------------------------
// Exports

pub use accessor_table::TypeAccessorTable;
pub use resolver::{AccessorResolver, AccessorResolverBuilder, ResolverStats};
