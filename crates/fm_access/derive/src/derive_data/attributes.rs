use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Path, Type};

use crate::MAPPABLE_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Type attributes

/// How the derived type is constructed.
#[derive(Debug)]
pub(crate) enum ConstructorAttr {
    /// `#[mappable(default)]`
    Default(Span),
    /// `#[mappable(constructor = path)]`
    Path(Path),
}

/// `#[mappable(property(name = "..", ty = T, get = path, set = path))]`
#[derive(Debug)]
pub(crate) struct PropertyAttr {
    pub name: LitStr,
    pub ty: Type,
    pub get: Option<Path>,
    pub set: Option<Path>,
}

impl PropertyAttr {
    fn parse(meta: &ParseNestedMeta) -> syn::Result<Self> {
        let mut name: Option<LitStr> = None;
        let mut ty: Option<Type> = None;
        let mut get: Option<Path> = None;
        let mut set: Option<Path> = None;

        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("name") {
                name = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("ty") {
                ty = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("get") {
                get = Some(inner.value()?.parse()?);
            } else if inner.path.is_ident("set") {
                set = Some(inner.value()?.parse()?);
            } else {
                return Err(inner.error("expected `name`, `ty`, `get` or `set`"));
            }
            Ok(())
        })?;

        let name = name.ok_or_else(|| meta.error("property requires `name = \"...\"`"))?;
        let ty = ty.ok_or_else(|| meta.error("property requires `ty = Type`"))?;
        if get.is_none() && set.is_none() {
            return Err(meta.error("property requires `get` or `set`"));
        }

        Ok(Self { name, ty, get, set })
    }
}

/// Attributes on the type itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub constructor: Option<ConstructorAttr>,
    pub properties: Vec<PropertyAttr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(MAPPABLE_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(&meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: &ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("default") {
            self.set_constructor(meta, ConstructorAttr::Default(meta.path.span()))
        } else if meta.path.is_ident("constructor") {
            let path: Path = meta.value()?.parse()?;
            self.set_constructor(meta, ConstructorAttr::Path(path))
        } else if meta.path.is_ident("property") {
            self.properties.push(PropertyAttr::parse(meta)?);
            Ok(())
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(meta.path.span());
            Ok(())
        } else {
            Err(meta.error("expected `default`, `constructor`, `property` or `auto_register`"))
        }
    }

    fn set_constructor(
        &mut self,
        meta: &ParseNestedMeta,
        ctor: ConstructorAttr,
    ) -> syn::Result<()> {
        if self.constructor.is_some() {
            return Err(meta.error("the constructor is already specified"));
        }
        self.constructor = Some(ctor);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Attributes on one field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub skip: bool,
    pub readonly: bool,
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(MAPPABLE_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = true;
                } else if meta.path.is_ident("readonly") {
                    this.readonly = true;
                } else if meta.path.is_ident("rename") {
                    this.rename = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("expected `skip`, `readonly` or `rename`"));
                }
                Ok(())
            })?;
        }
        Ok(this)
    }
}
