// -----------------------------------------------------------------------------
// Modules

mod error;
mod ident;
mod index;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use error::EntityError;
pub use ident::{Entity, EntityGeneration, EntityId};
pub use index::Entities;
pub use record::Record;
