//! Paths used by generated code.
//!
//! Keeping them in one place limits the changes needed when the layout of
//! `mr_record` changes.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `mr_record` crate.
///
/// 1. For crates that depend on `mr_record`, `::mr_record` is returned.
/// 2. For crates that depend on `mr_core`, `::mr_core::record` is returned.
/// 3. For crates that depend on `mr`, `::mr::record` is returned.
/// 4. Otherwise `::mr_record` is returned, which may be incorrect.
///
/// This reads the caller's manifest, so it is resolved once per derive and
/// passed around.
pub(crate) fn mr_record() -> syn::Path {
    mr_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("mr_record"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn record_(mr_record_path: &syn::Path) -> TokenStream {
    quote! {
        #mr_record_path::registry::Record
    }
}

#[inline(always)]
pub(crate) fn type_registry_(mr_record_path: &syn::Path) -> TokenStream {
    quote! {
        #mr_record_path::registry::TypeRegistry
    }
}

#[inline(always)]
pub(crate) fn field_descriptor_(mr_record_path: &syn::Path) -> TokenStream {
    quote! {
        #mr_record_path::info::FieldDescriptor
    }
}

#[inline(always)]
pub(crate) fn vec_(mr_record_path: &syn::Path) -> TokenStream {
    quote! {
        #mr_record_path::__macro_exports::Vec
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(mr_record_path: &syn::Path) -> TokenStream {
    quote! {
        #mr_record_path::__macro_exports::auto_register
    }
}
