use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::attributes::{FieldAttributes, FieldKind, TypeAttributes};

// -----------------------------------------------------------------------------
// RecordField

struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: LitStr,
    kind: Option<FieldKind>,
}

impl RecordField<'_> {
    /// The nested record type to register, if any.
    fn dependency(&self) -> Option<&Type> {
        match (self.kind, self.ty) {
            (Some(FieldKind::Nested), Type::Array(array)) => Some(&*array.elem),
            (Some(FieldKind::Nested), ty) => Some(ty),
            _ => None,
        }
    }

    fn descriptor(&self, field_descriptor_: &TokenStream) -> TokenStream {
        let RecordField { ident, ty, name, kind } = self;
        let constructor = match (kind, ty) {
            (Some(FieldKind::Function), _) => {
                return quote_spanned! { ident.span() =>
                    #field_descriptor_::function(#name)
                };
            }
            (Some(FieldKind::Text), _) => format_ident!("text"),
            (Some(FieldKind::Pointer), _) => format_ident!("pointer"),
            (Some(FieldKind::Nested), Type::Array(_)) => format_ident!("record_array"),
            (Some(FieldKind::Nested), _) => format_ident!("record"),
            (None, Type::Array(_)) => format_ident!("array"),
            (None, _) => format_ident!("scalar"),
        };

        quote_spanned! { ty.span() =>
            #field_descriptor_::#constructor::<Self, #ty>(
                #name,
                |record| &record.#ident,
                |record| &mut record.#ident,
            )
        }
    }
}

// -----------------------------------------------------------------------------
// RecordStruct

pub(crate) struct RecordStruct<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    fields: Vec<RecordField<'a>>,
    mr_record_path: syn::Path,
}

impl<'a> RecordStruct<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`Record` cannot be derived for generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Record` can only be derived for structs with named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`Record` can only be derived for structs",
                ));
            }
        };

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip.is_some() {
                continue;
            }
            // Named fields always have an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let name = field_attrs.rename.unwrap_or_else(|| {
                let unraw = ident.to_string();
                LitStr::new(unraw.trim_start_matches("r#"), ident.span())
            });
            fields.push(RecordField {
                ident,
                ty: &field.ty,
                name,
                kind: field_attrs.kind,
            });
        }

        Ok(Self {
            ident: &ast.ident,
            attrs,
            fields,
            mr_record_path: crate::path::mr_record(),
        })
    }

    fn record_id(&self) -> TokenStream {
        match &self.attrs.id {
            Some(id) => quote! { #id },
            None => {
                let name = self.ident.to_string();
                quote! {
                    ::core::concat!(::core::module_path!(), "::", #name)
                }
            }
        }
    }

    pub fn to_impl(&self) -> TokenStream {
        let mr_record_path = &self.mr_record_path;
        let record_ = crate::path::record_(mr_record_path);
        let type_registry_ = crate::path::type_registry_(mr_record_path);
        let field_descriptor_ = crate::path::field_descriptor_(mr_record_path);
        let vec_ = crate::path::vec_(mr_record_path);

        let ident = self.ident;
        let record_id = self.record_id();
        let descriptors = self
            .fields
            .iter()
            .map(|field| field.descriptor(&field_descriptor_));
        let dependencies = self.fields.iter().filter_map(RecordField::dependency);
        let auto_register = self.auto_register_impl();

        quote! {
            impl #record_ for #ident {
                #[inline]
                fn record_id() -> &'static str {
                    #record_id
                }

                fn fields() -> #vec_<#field_descriptor_> {
                    #vec_::from([
                        #(#descriptors,)*
                    ])
                }

                fn register_dependencies(_registry: &mut #type_registry_) {
                    #(_registry.register::<#dependencies>();)*
                }
            }

            #auto_register
        }
    }

    #[cfg(feature = "auto_register")]
    fn auto_register_impl(&self) -> TokenStream {
        let Some(span) = self.attrs.auto_register else {
            return TokenStream::new();
        };
        let auto_register_ = crate::path::auto_register_(&self.mr_record_path);
        let type_registry_ = crate::path::type_registry_(&self.mr_record_path);
        let ident = self.ident;

        quote_spanned! { span =>
            #auto_register_::inventory::submit! {
                #auto_register_::__AutoRegisterFunc(
                    <#type_registry_>::register::<#ident>
                )
            }
        }
    }

    #[cfg(not(feature = "auto_register"))]
    fn auto_register_impl(&self) -> TokenStream {
        TokenStream::new()
    }
}
