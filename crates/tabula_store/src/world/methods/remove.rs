use crate::entity::{Entity, EntityError, Record};
use crate::storage::{RowRemoval, TableId, TableRow};
use crate::world::World;

impl World {
    /// Destroys a row by swap-remove and keeps the entity index in sync.
    ///
    /// The last row moves into `row` and its entity's record is rewritten
    /// to point there. The removed entity stays alive but is no longer
    /// stored in any table. Returns the removed entity.
    ///
    /// Detached rows are not tracked: if the last row was inserted without
    /// an entity, any record held for it now names the wrong row.
    ///
    /// # Panics
    /// Panics if `table` does not belong to this world or `row` is out of
    /// bounds.
    pub fn remove(&mut self, table: TableId, row: TableRow) -> Option<Entity> {
        let removal = self.swap_remove_row(Record::new(table, row));
        if let Some(removed) = removal.removed {
            self.entities.update(removed, None);
        }
        removal.removed
    }

    /// Frees an entity and destroys its row, if it has one.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EntityError> {
        if let Some(record) = self.entities.free(entity)? {
            self.swap_remove_row(record);
        }
        Ok(())
    }

    fn swap_remove_row(&mut self, record: Record) -> RowRemoval {
        let Some(table) = self.tables.get_mut(record.table) else {
            panic!("table {} does not exist", record.table);
        };

        let removal = table.swap_remove(record.row);
        if let Some(moved) = removal.moved {
            self.entities.update(moved, Some(record));
        }
        removal
    }
}
