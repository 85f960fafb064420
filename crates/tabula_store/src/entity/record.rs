use core::fmt::Debug;

use crate::storage::{TableId, TableRow};

// -----------------------------------------------------------------------------
// Record

/// Where an entity's component data currently lives.
///
/// A record names a row, not an address, so it survives table growth. It is
/// invalidated when the row's occupant leaves the table, and rewritten by the
/// index whenever a swap-remove moves the entity to another row.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    pub table: TableId,
    pub row: TableRow,
}

impl Record {
    #[inline(always)]
    pub const fn new(table: TableId, row: TableRow) -> Self {
        Self { table, row }
    }
}

impl Debug for Record {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Record({}:{})", self.table, self.row)
    }
}
