use alloc::string::ToString;
use alloc::vec::Vec;

use crate::component::ComponentId;
use crate::storage::{Table, TableError, TableId, TypeSet};
use crate::world::World;

impl World {
    /// Returns the table for a set of component ids, in any order.
    ///
    /// Duplicate ids are ignored.
    #[inline]
    pub fn table_from_ids(
        &mut self,
        ids: impl IntoIterator<Item = ComponentId>,
    ) -> Result<TableId, TableError> {
        self.tables
            .find_or_create(&self.components, &TypeSet::new(ids))
    }

    /// Returns the table for a comma separated list of component names.
    ///
    /// Names are trimmed and looked up with
    /// [`Components::lookup`](crate::component::Components::lookup). The
    /// empty string selects the root table.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tabula_store::world::World;
    /// # use tabula_store::component::Component;
    /// struct Position([f32; 2]);
    /// struct Velocity([f32; 2]);
    /// unsafe impl Component for Position {}
    /// unsafe impl Component for Velocity {}
    ///
    /// let mut world = World::new();
    /// world.register_component::<Position>();
    /// world.register_component::<Velocity>();
    ///
    /// let a = world.table_from_str("Position, Velocity").unwrap();
    /// let b = world.table_from_str("Velocity,Position").unwrap();
    /// assert_eq!(a, b);
    /// assert!(world.table_from_str("Position, Mass").is_err());
    /// ```
    pub fn table_from_str(&mut self, names: &str) -> Result<TableId, TableError> {
        if names.trim().is_empty() {
            return Ok(TableId::EMPTY);
        }

        let ids = names
            .split(',')
            .enumerate()
            .map(|(index, name)| {
                let name = name.trim();
                if name.is_empty() {
                    return Err(TableError::EmptyName { index });
                }
                self.components
                    .lookup(name)
                    .ok_or_else(|| TableError::UnknownName(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.table_from_ids(ids)
    }

    #[inline]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Mutable access to a table's columns.
    ///
    /// Rows cannot be added or removed through the returned reference; that
    /// goes through the `World` so the entity index stays in sync.
    #[inline]
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id)
    }
}
