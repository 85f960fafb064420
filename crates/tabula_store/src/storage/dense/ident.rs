use core::fmt::{Debug, Display};
use core::hash::Hash;

use tabula_utils::num::NonMaxU32;

// -----------------------------------------------------------------------------
// TableId

/// Identifies a table inside [`Tables`](super::Tables).
///
/// A table is created once per canonical type set and never destroyed, so a
/// `TableId` stays valid for the life of its `World`.
#[derive(Copy, Clone, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TableId(NonMaxU32);

impl TableId {
    /// The root table, whose type set is empty.
    pub const EMPTY: TableId = TableId(NonMaxU32::ZERO);

    /// # Panics
    /// Panics if `id` would exceed the maximum number of tables.
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        match NonMaxU32::new(id) {
            Some(id) => Self(id),
            None => panic!("too many tables"),
        }
    }

    /// Returns the table index as a usize.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0.get() as usize
    }
}

impl Debug for TableId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for TableId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Hash for TableId {
    #[inline(always)]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.get());
    }
}

impl PartialEq for TableId {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for TableId {}

// -----------------------------------------------------------------------------
// TableRow

/// Row position within a table.
///
/// Only meaningful while the row's occupant stays in the table: removing
/// another row may move the last row into a freed slot.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TableRow(pub u32);

impl TableRow {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for TableRow {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for TableRow {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Hash for TableRow {
    #[inline(always)]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0);
    }
}

// -----------------------------------------------------------------------------
// TableCol

/// Column position within a table.
///
/// Columns are ordered like the table's type set, so the index of a
/// component's column is its position in the sorted id list.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TableCol(pub u32);

impl TableCol {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for TableCol {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for TableCol {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Hash for TableCol {
    #[inline(always)]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0);
    }
}
