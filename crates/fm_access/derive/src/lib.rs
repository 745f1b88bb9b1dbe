//! See [`Mappable`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MAPPABLE_ATTRIBUTE_NAME: &str = "mappable";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Mappable Derivation
///
/// `#[derive(Mappable)]` implements `GetTypeMeta` for a struct, describing
/// its fields as members and, optionally, its parameterless constructor.
///
/// Named and tuple structs are supported; tuple fields are named `"0"`,
/// `"1"`, ... Enums and unions are rejected.
///
/// `pub` fields are public members, all other fields are private members.
/// Which of them are mapped is decided by the discovery strategy.
///
/// ## Field Attributes
///
/// - `#[mappable(skip)]`: not a member.
/// - `#[mappable(readonly)]`: a member without setter.
/// - `#[mappable(rename = "name")]`: member name other than the field name.
///
/// Field types must be `Clone + 'static`: getters return copies.
///
/// ```rust, ignore
/// #[derive(Mappable)]
/// struct Foo {
///     pub name: String,
///     #[mappable(readonly)]
///     pub id: u64,
///     #[mappable(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// ## Type Attributes
///
/// - `default`: use `Default::default` as constructor.
/// - `constructor = path`: use `path` (a `fn() -> Self`, may be private).
/// - `property(name = "..", ty = T, get = path, set = path)`: a computed
///   member; `get` is a `fn(&Self) -> T`, `set` a `fn(&mut Self, T)`, each
///   of them optional.
/// - `auto_register`: register the type in `TypeRegistry::auto_register`.
///   Ignored for generic types and without the `auto_register` feature.
///
/// ```rust, ignore
/// #[derive(Mappable)]
/// #[mappable(constructor = Temperature::zero)]
/// #[mappable(property(name = "fahrenheit", ty = f64, get = Temperature::fahrenheit))]
/// struct Temperature {
///     pub celsius: f64,
/// }
///
/// impl Temperature {
///     fn zero() -> Self { Self { celsius: 0.0 } }
///     fn fahrenheit(&self) -> f64 { self.celsius * 1.8 + 32.0 }
/// }
/// ```
#[proc_macro_derive(Mappable, attributes(mappable))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::MappableStruct::from_derive_input(&ast) {
        Ok(data) => impls::impl_mappable(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
