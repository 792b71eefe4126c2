//! Deterministic hashing for registry keys.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

/// Seed shared by every [`FixedHashState`].
const SEED: u64 = 0x3C6E_F372_FE94_F82B;

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A [`BuildHasher`] whose output depends on nothing but the hashed value.
///
/// Record ids therefore land in the same buckets in every process, which keeps
/// registry iteration order reproducible between runs.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use mr_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("record");
/// let b = FixedHashState.hash_one("record");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct FixedHashState;

impl FixedHashState {
    const STATE: FixedState = FixedState::with_seed(SEED);
}

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> FixedHasher {
        Self::STATE.build_hasher()
    }
}
