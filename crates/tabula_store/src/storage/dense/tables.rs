#![allow(clippy::len_without_is_empty, reason = "the root table always exists")]

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use log::debug;
use tabula_utils::hash::hash_map::RawEntryMut;
use tabula_utils::hash::{FixedHashState, HashMap};

use super::{Table, TableBuilder, TableId, TypeSet};
use crate::component::{ComponentId, Components};
use crate::storage::TableError;

// -----------------------------------------------------------------------------
// Tables

/// The table graph: one [`Table`] per canonical type set.
///
/// Tables are created on first request and live as long as the registry,
/// so every entity with the same component set is stored in the same table.
/// Index `0` is the root table with the empty type set.
pub struct Tables {
    tables: Vec<Table>,
    mapper: HashMap<Box<[ComponentId]>, TableId>,
}

impl Debug for Tables {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.tables.iter().enumerate())
            .finish()
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    /// Creates a registry holding only the root table.
    pub fn new() -> Self {
        let mut tables: Vec<Table> = Vec::new();
        let mut mapper: HashMap<Box<[ComponentId]>, TableId> =
            HashMap::with_hasher(FixedHashState);

        tables.push(TableBuilder::new(0).build(TableId::EMPTY));
        mapper.insert(Box::new([]), TableId::EMPTY);

        Tables { tables, mapper }
    }

    /// Returns the number of tables, including the root table.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Table> {
        self.tables.iter()
    }

    /// Returns a reference to the table with the given ID, if it exists.
    #[inline(always)]
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.index())
    }

    /// Returns a mutable reference to the table with the given ID, if it exists.
    #[inline(always)]
    pub fn get_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.index())
    }

    /// # Safety
    /// - `id` must be a valid table ID obtained from this registry.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, id: TableId) -> &Table {
        debug_assert!(id.index() < self.tables.len());
        unsafe { self.tables.get_unchecked(id.index()) }
    }

    /// # Safety
    /// - `id` must be a valid table ID obtained from this registry.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, id: TableId) -> &mut Table {
        debug_assert!(id.index() < self.tables.len());
        unsafe { self.tables.get_unchecked_mut(id.index()) }
    }

    /// Borrows two different tables mutably.
    ///
    /// Returns `None` if the ids are equal or out of bounds.
    #[inline]
    pub(crate) fn get_pair_mut(
        &mut self,
        a: TableId,
        b: TableId,
    ) -> Option<(&mut Table, &mut Table)> {
        let [a, b] = self.tables.get_disjoint_mut([a.index(), b.index()]).ok()?;
        Some((a, b))
    }

    /// Returns the ID of the table exactly matching the given type set, if any.
    #[inline]
    pub fn get_id(&self, set: &TypeSet) -> Option<TableId> {
        self.mapper.get(set.as_slice()).copied()
    }

    /// Returns the table for `set`, creating it if it does not exist yet.
    ///
    /// A new table gets one empty column per component, built from the
    /// layout and hooks in `components`. If any id has no registered
    /// layout, nothing is created and [`TableError::UnknownComponent`] is
    /// returned.
    pub fn find_or_create(
        &mut self,
        components: &Components,
        set: &TypeSet,
    ) -> Result<TableId, TableError> {
        match self.mapper.raw_entry_mut().from_key(set.as_slice()) {
            RawEntryMut::Occupied(entry) => Ok(*entry.get()),
            RawEntryMut::Vacant(entry) => {
                let mut builder = TableBuilder::new(set.len());
                for &id in set.iter() {
                    let info = components
                        .get(id)
                        .ok_or(TableError::UnknownComponent(id))?;
                    builder.insert(info);
                }

                let table_id = TableId::new(self.tables.len() as u32);
                self.tables.push(builder.build(table_id));
                entry.insert(Box::from(set.as_slice()), table_id);

                debug!("created table {table_id} for components {set:?}");
                Ok(table_id)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Tables;
    use crate::component::{Component, Components};
    use crate::storage::{TableError, TableId, TableRow, TypeSet};

    struct A(u32);
    unsafe impl Component for A {}
    struct B(u64);
    unsafe impl Component for B {}
    struct C;
    unsafe impl Component for C {}

    #[test]
    fn find_or_create_ignores_order() {
        let mut components = Components::new();
        let a = components.register::<A>();
        let b = components.register::<B>();
        let c = components.register::<C>();

        let mut tables = Tables::new();
        let ab = tables.find_or_create(&components, &TypeSet::new([a, b])).unwrap();
        let ba = tables.find_or_create(&components, &TypeSet::new([b, a])).unwrap();
        assert_eq!(ab, ba);
        assert_ne!(ab, TableId::EMPTY);

        let abc = tables.find_or_create(&components, &TypeSet::new([c, b, a])).unwrap();
        assert_ne!(abc, ab);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables.get(abc).unwrap().components(), &[a, b, c]);

        let root = tables.find_or_create(&components, &TypeSet::empty()).unwrap();
        assert_eq!(root, TableId::EMPTY);
        assert_eq!(tables.get_id(&TypeSet::new([a, b])), Some(ab));
    }

    #[test]
    fn unknown_component_creates_nothing() {
        let mut components = Components::new();
        let a = components.register::<A>();
        let b = components.register::<B>();

        let mut tables = Tables::new();
        let mut other = Components::new();
        other.register::<A>();

        let result = tables.find_or_create(&other, &TypeSet::new([a, b]));
        assert_eq!(result, Err(TableError::UnknownComponent(b)));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.get_id(&TypeSet::new([a, b])), None);

        let created = tables.find_or_create(&components, &TypeSet::new([a, b]));
        assert!(created.is_ok());
    }

    #[test]
    fn move_row_between_tables() {
        let mut components = Components::new();
        let a = components.register::<A>();
        let b = components.register::<B>();
        let c = components.register::<C>();

        let mut tables = Tables::new();
        let src = tables.find_or_create(&components, &TypeSet::new([a, b])).unwrap();
        let dst = tables.find_or_create(&components, &TypeSet::new([a, c])).unwrap();

        let (from, to) = tables.get_pair_mut(src, dst).unwrap();
        for value in 0..3u32 {
            let row = from.allocate(None);
            let col = from.find_column(a).unwrap();
            unsafe {
                from.get_column_unchecked_mut(col).as_mut_slice::<A>()[row.index()] = A(value);
            }
        }

        let moved = from.move_row_to(TableRow(0), to);
        assert_eq!(moved.new_row, TableRow(0));
        assert_eq!(from.count(), 2);
        assert_eq!(to.count(), 1);

        let col = to.find_column(a).unwrap();
        let values = unsafe { to.get_column_unchecked(col).as_slice::<A>() };
        assert_eq!(values[0].0, 0);
        let col = from.find_column(a).unwrap();
        let left: alloc::vec::Vec<u32> = unsafe { from.get_column_unchecked(col).as_slice::<A>() }
            .iter()
            .map(|v| v.0)
            .collect();
        assert_eq!(left, [2, 1]);
        assert_eq!(to.columns().iter().map(|c| c.len()).sum::<usize>(), 2);

        assert!(tables.get_pair_mut(src, src).is_none());
    }
}
