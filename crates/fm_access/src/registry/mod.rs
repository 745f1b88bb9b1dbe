//! The host type system: which types exist, what members they declare and
//! how to construct them.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: members and constructor of one type.
//! - [`GetTypeMeta`]: a type that can describe itself, usually implemented
//!   by [`#[derive(Mappable)]`](crate::derive::Mappable).
//! - [`TypeRegistry`]: the owned store of [`TypeMeta`]s.
//!
//! The registry is filled before use and then shared read-only, see
//! [`AccessorResolver`](crate::table::AccessorResolver).
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! Static registration relies on the [`inventory`] crate. Platforms without
//! support make the function return `false` instead of failing.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
