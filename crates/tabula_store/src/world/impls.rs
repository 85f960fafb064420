use core::fmt::Debug;

use crate::component::Components;
use crate::entity::Entities;
use crate::storage::Tables;

/// The component registry, the table graph and the entity index, kept
/// consistent with each other.
///
/// Every direct-access operation goes through the `World`: it resolves
/// records, updates the index when rows move, and forwards to the table.
/// The fields are public for read access and for operations that cannot
/// break that consistency.
pub struct World {
    pub components: Components,
    pub tables: Tables,
    pub entities: Entities,
}

impl Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("components", &self.components)
            .field("tables", &self.tables)
            .field("entities", &self.entities)
            .finish()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> World {
        Self {
            components: Components::new(),
            tables: Tables::new(),
            entities: Entities::new(),
        }
    }
}
