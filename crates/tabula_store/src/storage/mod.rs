// -----------------------------------------------------------------------------
// Modules

mod column;
mod dense;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub use column::Column;
pub use dense::{RowRemoval, Table, TableMove, Tables, TypeSet};
pub use dense::{TableCol, TableId, TableRow};
pub use error::TableError;

/// The capacity of a column's first allocation. Later growth doubles.
pub const MIN_CAPACITY: usize = 4;
