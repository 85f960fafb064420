use thiserror::Error;

use crate::entity::EntityError;
use crate::storage::TableId;

/// An error that occurs when moving an entity between tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error("table {0} does not exist")]
    UnknownTable(TableId),
}
