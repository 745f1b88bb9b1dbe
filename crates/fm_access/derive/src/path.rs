//! Paths used by generated code, kept in one place so that a change of the
//! `fm_access` layout only touches this file.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Returns the path of `fm_access` as seen from the crate being expanded.
///
/// 1. Crates depending on `fm_access` get `::fm_access`.
/// 2. Crates depending on the facade `fm_core` get `::fm_core::access`.
/// 3. Otherwise `::fm_access`, which may not resolve.
///
/// Reads the caller's `Cargo.toml`: call once per expansion.
pub(crate) fn fm_access() -> syn::Path {
    fm_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("fm_access"))
}

// -----------------------------------------------------------------------------
// Internal API

#[inline(always)]
pub(crate) fn get_type_meta_(fm_access_path: &syn::Path) -> TokenStream {
    quote! {
        #fm_access_path::registry::GetTypeMeta
    }
}

#[inline(always)]
pub(crate) fn type_meta_(fm_access_path: &syn::Path) -> TokenStream {
    quote! {
        #fm_access_path::registry::TypeMeta
    }
}

#[inline(always)]
pub(crate) fn member_descriptor_(fm_access_path: &syn::Path) -> TokenStream {
    quote! {
        #fm_access_path::info::MemberDescriptor
    }
}

#[inline(always)]
pub(crate) fn visibility_(fm_access_path: &syn::Path) -> TokenStream {
    quote! {
        #fm_access_path::info::Visibility
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(fm_access_path: &syn::Path) -> TokenStream {
    quote! {
        #fm_access_path::__macro_exports::auto_register
    }
}
