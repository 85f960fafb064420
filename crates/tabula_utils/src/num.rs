//! Niche-optimised integers.

use core::cmp::Ordering;
use core::fmt::{Debug, Display};
use core::hash::{Hash, Hasher};
use core::num::NonZeroU32;

// -----------------------------------------------------------------------------
// NonMaxU32

/// A `u32` that is known not to equal [`u32::MAX`].
///
/// The value is stored XOR-ed with `u32::MAX` inside a [`NonZeroU32`], so
/// `Option<NonMaxU32>` is the same size as `u32`:
///
/// ```
/// use tabula_utils::num::NonMaxU32;
///
/// assert_eq!(size_of::<Option<NonMaxU32>>(), size_of::<u32>());
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct NonMaxU32(NonZeroU32);

impl NonMaxU32 {
    /// The value `0`.
    pub const ZERO: NonMaxU32 = match NonMaxU32::new(0) {
        Some(v) => v,
        None => unreachable!(),
    };

    /// The largest representable value, `u32::MAX - 1`.
    pub const MAX: NonMaxU32 = match NonMaxU32::new(u32::MAX - 1) {
        Some(v) => v,
        None => unreachable!(),
    };

    /// Returns `None` if `n == u32::MAX`.
    #[inline(always)]
    pub const fn new(n: u32) -> Option<Self> {
        match NonZeroU32::new(n ^ u32::MAX) {
            Some(inner) => Some(Self(inner)),
            None => None,
        }
    }

    /// Returns the stored value.
    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0.get() ^ u32::MAX
    }
}

impl PartialOrd for NonMaxU32 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NonMaxU32 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl Hash for NonMaxU32 {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.get());
    }
}

impl From<NonMaxU32> for u32 {
    #[inline]
    fn from(value: NonMaxU32) -> Self {
        value.get()
    }
}

impl Debug for NonMaxU32 {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.get(), f)
    }
}

impl Display for NonMaxU32 {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.get(), f)
    }
}
