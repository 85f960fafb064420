//! A `foldhash` hasher with a fixed seed.
//!
//! Results only depend on the input, never on process state.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x51_7C_C1_B7_27_22_0A_95);

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use tabula_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one(7u32), FixedHashState.hash_one(7u32));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}
