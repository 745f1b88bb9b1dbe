//! Parse the derive input into the data codegen needs.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod mappable_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{ConstructorAttr, FieldAttributes, PropertyAttr, TypeAttributes};
pub(crate) use mappable_struct::{MappableField, MappableStruct};
