//! Fixed strings written in place of values that are not serialized.

/// A callable reference.
pub const FUNCTION: &str = "[function_pointer]";

/// A raw address.
pub const POINTER: &str = "[pointer]";

/// A nested record whose id is not registered.
pub const STRUCT: &str = "[struct]";

/// A field of [`TypeCode::Unknown`](crate::info::TypeCode::Unknown).
pub const UNKNOWN_TYPE: &str = "[unknown_type]";

/// The only element of an array whose element kind is not supported.
pub const UNKNOWN_ARRAY_TYPE: &str = "[unknown_array_type]";

/// A field that failed to encode.
pub const ERROR: &str = "[error]";
