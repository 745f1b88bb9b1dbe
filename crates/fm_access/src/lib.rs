#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive emits `::fm_access::...` paths. The alias lets the crate
// use its own derive in tests and doc examples.
extern crate self as fm_access;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod cache;
pub mod compile;
pub mod discovery;
pub mod info;
pub mod registry;
pub mod table;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::{AccessError, MismatchTarget};

#[cfg(feature = "derive")]
pub mod derive;
