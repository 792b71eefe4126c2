//! Items referenced by code that `#[derive(Record)]` generates.
//!
//! Not public API.

pub use alloc::vec::Vec;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegistry;

    /// A registration hook submitted by `#[record(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    /// Runs every submitted hook against `registry`, returning how many ran.
    pub(crate) fn __register_records(registry: &mut TypeRegistry) -> usize {
        let mut count = 0;
        for hook in inventory::iter::<__AutoRegisterFunc> {
            (hook.0)(registry);
            count += 1;
        }
        count
    }
}
