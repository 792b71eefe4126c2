//! Record metadata storage.
//!
//! ## Menu
//!
//! - [`Record`]: a type that can describe its own fields.
//! - [`RecordInfo`]: the ordered field list of one record id.
//! - [`TypeRegistry`]: record id to [`RecordInfo`] map used by the engine.
//! - [`TypeRegistryArc`]: shared, lock-protected registry (`std` only).
//! - [`RegistryError`]: problems reported by [`TypeRegistry::validate`].
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! Records marked with `#[record(auto_register)]` are collected through the
//! [`inventory`] crate. Platforms that `inventory` does not support simply
//! collect nothing.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod record;
mod type_registry;
mod validate;

// -----------------------------------------------------------------------------
// Exports

pub use record::{Record, RecordInfo};
pub use type_registry::TypeRegistry;
pub use validate::RegistryError;

#[cfg(feature = "std")]
pub use type_registry::TypeRegistryArc;
