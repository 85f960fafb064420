// -----------------------------------------------------------------------------
// Module

mod ident;
mod table;
mod tables;
mod type_set;

// -----------------------------------------------------------------------------
// Internal

use table::TableBuilder;

// -----------------------------------------------------------------------------
// Exports

pub use ident::{TableCol, TableId, TableRow};
pub use table::{RowRemoval, Table, TableMove};
pub use tables::Tables;
pub use type_set::TypeSet;
