//! See [`Record`](derive@Record).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod path;
mod record_struct;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements `Record` for a non-generic struct with
/// named fields: a record id, one `FieldDescriptor` per field (in
/// declaration order) and the registration of nested records.
///
/// ## Field Kinds
///
/// Without attributes, a field is described by its syntax:
///
/// - `[T; N]`: an array of scalars.
/// - anything else: a scalar (`i8`-`i64`, `u8`-`u64`, `f32`, `f64`, `bool`).
///
/// Other kinds are selected with a field attribute:
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct Person {
///     #[record(text)]
///     name: [u8; 32],
///     #[record(nested)]
///     address: Address,
///     #[record(nested)]
///     cars: [Car; 3],
///     #[record(pointer)]
///     manager: *const Person,
///     #[record(function)]
///     on_change: fn(&Person),
/// }
/// ```
///
/// - `text`: a zero-terminated `[u8; N]` buffer.
/// - `nested`: a record, or a fixed-size array of records. The nested type is
///   registered together with the outer one.
/// - `pointer`: a raw pointer or `Option`, encoded as a placeholder and reset
///   to null on decode.
/// - `function`: encoded as a placeholder, never decoded.
///
/// ## Naming
///
/// - `#[record(rename = "json_name")]` changes the key of a field.
/// - `#[record(skip)]` leaves a field out of the record entirely.
///
/// ## Type Attributes
///
/// - `#[record(id = "...")]` overrides the record id, which defaults to
///   `module_path!()` followed by `::TypeName`.
/// - `#[record(auto_register)]` submits the record to
///   `TypeRegistry::auto_register` (requires the `auto_register` feature).
///
/// ```rust, ignore
/// #[derive(Record)]
/// #[record(id = "Car", auto_register)]
/// struct Car {
///     id: i32,
///     price: f64,
///     #[record(text)]
///     brand: [u8; 32],
/// }
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match record_struct::RecordStruct::parse(&ast) {
        Ok(record) => record.to_impl().into(),
        Err(err) => err.into_compile_error().into(),
    }
}
