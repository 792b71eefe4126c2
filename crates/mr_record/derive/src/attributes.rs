//! Parsing of `#[record(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

use crate::RECORD_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Type attributes

/// Attributes placed on the struct itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// `#[record(id = "...")]`
    pub id: Option<LitStr>,
    /// `#[record(auto_register)]`
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    set_once(&meta, &mut this.id, meta.value()?.parse()?)
                } else if meta.path.is_ident("auto_register") {
                    set_once(&meta, &mut this.auto_register, meta.path.require_ident()?.span())
                } else {
                    Err(meta.error("unsupported type attribute, expected `id` or `auto_register`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// The kind selected by a field attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Nested,
    Pointer,
    Function,
}

impl FieldKind {
    fn from_meta(meta: &ParseNestedMeta<'_>) -> Option<Self> {
        let path = &meta.path;
        if path.is_ident("text") {
            Some(Self::Text)
        } else if path.is_ident("nested") {
            Some(Self::Nested)
        } else if path.is_ident("pointer") {
            Some(Self::Pointer)
        } else if path.is_ident("function") {
            Some(Self::Function)
        } else {
            None
        }
    }
}

/// Attributes placed on a field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub kind: Option<FieldKind>,
    /// `#[record(rename = "...")]`
    pub rename: Option<LitStr>,
    /// `#[record(skip)]`
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if let Some(kind) = FieldKind::from_meta(&meta) {
                    if this.kind.is_some() {
                        return Err(meta.error("a field can only have one kind"));
                    }
                    this.kind = Some(kind);
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    set_once(&meta, &mut this.rename, meta.value()?.parse()?)
                } else if meta.path.is_ident("skip") {
                    set_once(&meta, &mut this.skip, meta.path.require_ident()?.span())
                } else {
                    Err(meta.error(
                        "unsupported field attribute, expected one of \
                         `text`, `nested`, `pointer`, `function`, `rename`, `skip`",
                    ))
                }
            })?;
        }
        Ok(this)
    }
}

fn set_once<T>(meta: &ParseNestedMeta<'_>, slot: &mut Option<T>, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}
