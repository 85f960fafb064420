use crate::cfg;
use crate::entity::{Entity, Record};
use crate::storage::TableId;
use crate::world::{MoveError, World};

impl World {
    /// Allocates an entity that is not stored in any table yet.
    #[inline]
    pub fn spawn_id(&mut self) -> Entity {
        self.entities.alloc()
    }

    /// Allocates an entity and stores it in a new row of `table`.
    pub fn spawn(&mut self, table: TableId) -> Entity {
        let entity = self.entities.alloc();
        self.insert(table, Some(entity));
        entity
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Appends a default-initialized row to `table` and returns its record.
    ///
    /// With `Some(entity)`, the entity's record in the index is set to the
    /// new row. The entity must be alive and not stored in any table yet.
    /// With `None`, the row is detached: nothing tracks it, and the returned
    /// record is only valid until a row is removed from this table.
    ///
    /// # Panics
    /// Panics if `table` does not belong to this world.
    pub fn insert(&mut self, table: TableId, entity: Option<Entity>) -> Record {
        let Some(storage) = self.tables.get_mut(table) else {
            panic!("table {table} does not exist");
        };

        if let Some(entity) = entity {
            cfg::debug! {
                assert!(self.entities.is_alive(entity), "cannot insert dead entity {entity}");
                assert!(
                    self.entities.find(entity).is_none(),
                    "entity {entity} is already stored in a table",
                );
            }
        }

        let row = storage.allocate(entity);
        let record = Record::new(table, row);
        if let Some(entity) = entity {
            self.entities.update(entity, Some(record));
        }
        record
    }

    /// Moves a placed entity's row to `dst`.
    ///
    /// Shared components keep their values, components missing from `dst`
    /// are destroyed, and components new in `dst` are default-initialized.
    /// Returns the entity's new record.
    pub fn move_entity(&mut self, entity: Entity, dst: TableId) -> Result<Record, MoveError> {
        let record = self.entities.locate(entity)?;
        if record.table == dst {
            return Ok(record);
        }

        let Some((from, to)) = self.tables.get_pair_mut(record.table, dst) else {
            return Err(MoveError::UnknownTable(dst));
        };
        let moved = from.move_row_to(record.row, to);

        if let Some(swapped) = moved.swapped {
            self.entities.update(swapped, Some(record));
        }
        let new_record = Record::new(dst, moved.new_row);
        self.entities.update(entity, Some(new_record));
        Ok(new_record)
    }
}
