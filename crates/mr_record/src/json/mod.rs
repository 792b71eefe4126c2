//! Conversion between records and [`serde_json::Value`] trees.
//!
//! # Overview
//!
//! - [`Encoder`]: walks the descriptors of a record id and builds an object,
//!   one entry per descriptor, in descriptor order.
//! - [`Decoder`]: walks the same descriptors and writes every field present
//!   in an object back into a record.
//! - [`to_value`], [`from_value`], [`to_string`], [`to_string_pretty`] and
//!   [`from_str`]: typed helpers for records implementing
//!   [`Record`](crate::registry::Record).
//! - [`encode_to_string`] and [`decode_from_str`]: untyped text helpers
//!   taking a record id.
//!
//! ## Errors
//!
//! Only problems that make a whole call meaningless are returned as
//! [`MarshalError`]: an unregistered id, an instance of the wrong type, a
//! non-object input or unreadable text. A problem with a single field is a
//! [`FieldError`]; it is logged with `log::error!` and contained to that
//! field, which is encoded as `"[error]"` or left untouched when decoding.
//!
//! ## Placeholders
//!
//! Values the engine refuses to serialize are written as fixed strings, see
//! [`placeholder`].

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod error;
mod scalar;
mod text;
mod trail;

pub mod placeholder;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{FieldError, MarshalError};
pub use text::{decode_from_str, encode_to_string};
pub use text::{from_str, from_value, to_string, to_string_pretty, to_value};

// -----------------------------------------------------------------------------
// Tests
