//! Static metadata describing record fields.
//!
//! ## Menu
//!
//! - [`TypeCode`]: the closed set of field kinds the engine understands.
//! - [`FieldDescriptor`]: name, kind, layout and accessors of one field.
//! - [`FieldAccess`]: type-erased projection from a record to one field.
//! - Capability traits used by the typed descriptor constructors:
//!     - [`Scalar`]: integers, floats and `bool`.
//!     - [`TextBuffer`]: fixed, zero-terminated byte buffers.
//!     - [`FixedArray`]: `[T; N]`.
//!     - [`Nullable`]: raw pointers and `Option`, which decode to null.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod field;
mod traits;
mod type_code;

// -----------------------------------------------------------------------------
// Exports

pub use access::FieldAccess;
pub use field::FieldDescriptor;
pub use traits::{FixedArray, Nullable, Scalar, TextBuffer};
pub use type_code::TypeCode;

pub(crate) use access::FieldView;
