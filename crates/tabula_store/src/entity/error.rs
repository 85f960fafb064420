use thiserror::Error;

use crate::entity::{Entity, EntityId};

// -----------------------------------------------------------------------------
// Error

/// An error that occurs when resolving an [`Entity`] through the index.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntityError {
    #[error("Entity with ID {0} was never allocated")]
    NotFound(EntityId),

    #[error("Entity {0} is not alive")]
    NotAlive(Entity),

    #[error("Entity mismatch: expected {expect:?}, found {actual:?}")]
    Mismatch { expect: Entity, actual: Entity },

    #[error("Entity {0} is alive but not stored in any table")]
    NotPlaced(Entity),
}
