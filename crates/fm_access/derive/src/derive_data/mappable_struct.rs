use std::collections::HashSet;

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Generics, Ident, Index, Member, Path, Type};

use super::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// MappableField

/// A field that becomes a member.
#[derive(Debug)]
pub(crate) struct MappableField<'a> {
    /// How the generated accessors reach the field, `self.name` or `self.0`.
    pub member: Member,
    pub ty: &'a Type,
    /// The member name, after `rename`.
    pub name: String,
    pub is_public: bool,
    pub readonly: bool,
}

// -----------------------------------------------------------------------------
// MappableStruct

#[derive(Debug)]
pub(crate) struct MappableStruct<'a> {
    pub fm_access_path: Path,
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<MappableField<'a>>,
}

impl<'a> MappableStruct<'a> {
    pub fn from_derive_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let data = match &ast.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Mappable` can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Mappable` can only be derived for structs",
                ));
            }
        };

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "`Mappable` types must be `'static`, lifetime parameters are not supported",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut names: HashSet<String> = HashSet::new();
        let mut check_name = |name: &str, span: Span| {
            if names.insert(name.to_owned()) {
                Ok(())
            } else {
                Err(syn::Error::new(span, format!("duplicate member name `{name}`")))
            }
        };

        let mut fields = Vec::with_capacity(data.fields.len());
        for (index, field) in data.fields.iter().enumerate() {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip {
                continue;
            }

            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index {
                    index: index as u32,
                    span: field.ty.span(),
                }),
            };

            let name = match (&field_attrs.rename, &field.ident) {
                (Some(rename), _) => rename.value(),
                (None, Some(ident)) => ident.unraw().to_string(),
                (None, None) => index.to_string(),
            };
            check_name(&name, field.span())?;

            fields.push(MappableField {
                member,
                ty: &field.ty,
                name,
                is_public: matches!(field.vis, syn::Visibility::Public(_)),
                readonly: field_attrs.readonly,
            });
        }

        for property in &attrs.properties {
            check_name(&property.name.value(), property.name.span())?;
        }

        Ok(Self {
            fm_access_path: crate::path::fm_access(),
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
        })
    }

    /// Whether the type has type or const parameters.
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
            || self.generics.const_params().next().is_some()
    }
}
