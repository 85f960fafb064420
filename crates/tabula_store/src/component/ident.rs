use core::fmt::{Debug, Display};
use core::hash::Hash;

use tabula_utils::num::NonMaxU32;

// -----------------------------------------------------------------------------
// ComponentId

/// A unique identifier for a component type within a specific `World`.
///
/// Ids are handed out densely in registration order, so a canonical type set
/// is simply a sorted list of them. They are only meaningful inside the
/// registry that produced them.
///
/// Stored as a `NonMaxU32`, so `Option<ComponentId>` is the same size as
/// `ComponentId` itself.
#[derive(Clone, Copy, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentId(NonMaxU32);

impl ComponentId {
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        match NonMaxU32::new(id) {
            Some(id) => Self(id),
            None => panic!("too many components"),
        }
    }

    /// Convert `ComponentId` to u32.
    #[inline(always)]
    pub const fn index_u32(self) -> u32 {
        self.0.get()
    }

    /// Convert `ComponentId` to usize.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0.get() as usize
    }
}

impl PartialEq for ComponentId {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ComponentId {}

impl Hash for ComponentId {
    #[inline(always)]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.get());
    }
}

impl Debug for ComponentId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.index_u32(), f)
    }
}

impl Display for ComponentId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.index_u32(), f)
    }
}
