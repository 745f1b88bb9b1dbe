use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{Ident, parse_quote};

use crate::derive_data::{ConstructorAttr, MappableField, MappableStruct, PropertyAttr};

/// Generate the `GetTypeMeta` implementation.
///
/// Similar to following:
///
/// ```ignore
/// impl GetTypeMeta for Foo {
///     fn get_type_meta() -> TypeMeta {
///         let mut __outer = TypeMeta::with_capacity::<Self>(2);
///         TypeMeta::push_member(&mut __outer, MemberDescriptor::field::<Self, String>("name", ..));
///         TypeMeta::push_member(&mut __outer, MemberDescriptor::property::<Self, u32>("len", ..));
///         __outer = TypeMeta::with_constructor::<Self>(__outer, Foo::new);
///         __outer
///     }
/// }
/// ```
pub(crate) fn impl_trait_get_type_meta(data: &MappableStruct) -> TokenStream {
    let fm_access_path = &data.fm_access_path;
    let get_type_meta_ = crate::path::get_type_meta_(fm_access_path);
    let type_meta_ = crate::path::type_meta_(fm_access_path);

    let outer_ = Ident::new("__outer", Span::call_site());

    let capacity = data.fields.len() + data.attrs.properties.len();

    let push_fields = data.fields.iter().map(|field| {
        let descriptor = field_descriptor(data, field);
        quote! {
            #type_meta_::push_member(&mut #outer_, #descriptor);
        }
    });

    let push_properties = data.attrs.properties.iter().map(|property| {
        let descriptor = property_descriptor(data, property);
        quote! {
            #type_meta_::push_member(&mut #outer_, #descriptor);
        }
    });

    let set_constructor = match &data.attrs.constructor {
        Some(ConstructorAttr::Default(span)) => quote_spanned! { *span =>
            #outer_ = #type_meta_::with_constructor::<Self>(
                #outer_,
                <Self as ::core::default::Default>::default,
            );
        },
        Some(ConstructorAttr::Path(path)) => quote! {
            #outer_ = #type_meta_::with_constructor::<Self>(#outer_, #path);
        },
        None => TokenStream::new(),
    };

    // Every field type is returned by clone, and `Self: Any` needs `'static` parameters.
    let mut generics = data.generics.clone();
    let where_clause = generics.make_where_clause();
    for param in data.generics.type_params() {
        let ident = &param.ident;
        where_clause.predicates.push(parse_quote!(#ident: 'static));
    }
    for field in &data.fields {
        let ty = field.ty;
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::core::clone::Clone + 'static));
    }
    for property in &data.attrs.properties {
        let ty = &property.ty;
        where_clause.predicates.push(parse_quote!(#ty: 'static));
    }

    let ident = data.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                #[allow(unused_mut)]
                let mut #outer_ = #type_meta_::with_capacity::<Self>(#capacity);
                #(#push_fields)*
                #(#push_properties)*
                #set_constructor
                #outer_
            }
        }
    }
}

fn field_descriptor(data: &MappableStruct, field: &MappableField) -> TokenStream {
    let member_descriptor_ = crate::path::member_descriptor_(&data.fm_access_path);
    let visibility_ = crate::path::visibility_(&data.fm_access_path);

    let MappableField {
        member, ty, name, ..
    } = field;

    let descriptor = if field.readonly {
        quote! {
            #member_descriptor_::readonly_field::<Self, #ty>(#name, |__this| &__this.#member)
        }
    } else {
        quote! {
            #member_descriptor_::field::<Self, #ty>(
                #name,
                |__this| &__this.#member,
                |__this| &mut __this.#member,
            )
        }
    };

    if field.is_public {
        descriptor
    } else {
        quote! {
            #descriptor.with_visibility(#visibility_::Private)
        }
    }
}

fn property_descriptor(data: &MappableStruct, property: &PropertyAttr) -> TokenStream {
    let member_descriptor_ = crate::path::member_descriptor_(&data.fm_access_path);
    let PropertyAttr { name, ty, get, set } = property;

    let get = match get {
        Some(path) => quote! { ::core::option::Option::Some(#path as fn(&Self) -> #ty) },
        None => quote! { ::core::option::Option::None },
    };
    let set = match set {
        Some(path) => quote! { ::core::option::Option::Some(#path as fn(&mut Self, #ty)) },
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        #member_descriptor_::property::<Self, #ty>(#name, #get, #set)
    }
}
