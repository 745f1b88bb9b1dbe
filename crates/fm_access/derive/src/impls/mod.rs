//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod get_type_meta;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappableStruct;

pub(crate) fn impl_mappable(data: &MappableStruct) -> TokenStream {
    let get_type_meta_tokens = get_type_meta::impl_trait_get_type_meta(data);
    let auto_register_tokens = auto_register::get_auto_register_impl(data);

    quote! {
        #get_type_meta_tokens

        #auto_register_tokens
    }
}
