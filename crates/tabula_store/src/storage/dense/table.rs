use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use log::trace;

use super::{TableCol, TableId, TableRow};
use crate::cfg;
use crate::component::{ComponentId, ComponentInfo};
use crate::entity::Entity;
use crate::storage::{Column, MIN_CAPACITY};
use crate::utils::AbortOnPanic;

// -----------------------------------------------------------------------------
// TableBuilder

/// Builder for creating a new `Table` with a fixed set of component columns.
pub(super) struct TableBuilder {
    columns: Vec<Column>,
    idents: Vec<ComponentId>,
}

impl TableBuilder {
    /// Creates a new builder with pre-allocated capacity for the given column count.
    pub fn new(column_count: usize) -> Self {
        Self {
            columns: Vec::with_capacity(column_count),
            idents: Vec::with_capacity(column_count),
        }
    }

    /// Adds a column for a registered component.
    ///
    /// Components must be inserted in ascending id order.
    pub fn insert(&mut self, info: &ComponentInfo) -> TableCol {
        let index = self.columns.len() as u32;
        self.columns.push(Column::for_component(info));
        self.idents.push(info.id());

        TableCol(index)
    }

    /// Consumes the builder and creates the final `Table`.
    ///
    /// # Panics
    /// Panics if component IDs are not unique or not properly sorted.
    #[must_use]
    pub fn build(self, id: TableId) -> Table {
        assert!(self.idents.is_sorted_by(|a, b| a < b));

        Table {
            id,
            columns: self.columns.into_boxed_slice(),
            idents: self.idents.into_boxed_slice(),
            entities: Vec::new(),
            capacity: 0,
        }
    }
}

// -----------------------------------------------------------------------------
// Table

/// Columnar storage for all entities that share one type set.
///
/// Holds one [`Column`] per component, ordered like the sorted type set, and
/// the entity stored in each row. All columns always have the same length,
/// the table's row count, and at least the table's capacity.
///
/// Rows are dense: removing a row moves the last row into its place.
pub struct Table {
    id: TableId,
    idents: Box<[ComponentId]>,
    columns: Box<[Column]>,
    entities: Vec<Option<Entity>>,
    capacity: usize,
}

impl Debug for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("id", &self.id)
            .field("components", &self.idents)
            .field("entities", &self.entities)
            .finish()
    }
}

impl Table {
    #[inline(always)]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// The table's canonical type set.
    #[inline(always)]
    pub fn components(&self) -> &[ComponentId] {
        &self.idents
    }

    /// The entity stored in each row, `None` for rows inserted without one.
    #[inline(always)]
    pub fn entities(&self) -> &[Option<Entity>] {
        &self.entities
    }

    /// Returns the entity stored at `row`, if any.
    #[inline]
    pub fn entity(&self, row: TableRow) -> Option<Entity> {
        self.entities.get(row.index()).copied().flatten()
    }

    /// Returns the number of rows.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of rows every column can hold without reallocating.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds the column index of a component using binary search.
    ///
    /// Returns `None` if the component is not part of the table's type set.
    /// The result never changes for a given table and component.
    #[inline]
    pub fn find_column(&self, id: ComponentId) -> Option<TableCol> {
        let index = self.idents.binary_search(&id).ok()?;
        Some(TableCol(index as u32))
    }

    /// Returns a column by its index.
    ///
    /// Raw pointers obtained from the column are invalidated by any insert
    /// that grows the table.
    #[inline]
    pub fn get_column(&self, col: TableCol) -> Option<&Column> {
        self.columns.get(col.index())
    }

    #[inline]
    pub fn get_column_mut(&mut self, col: TableCol) -> Option<&mut Column> {
        self.columns.get_mut(col.index())
    }

    /// # Safety
    /// - `col` must be a valid column index obtained from `find_column()`.
    #[inline(always)]
    pub unsafe fn get_column_unchecked(&self, col: TableCol) -> &Column {
        debug_assert!(col.index() < self.columns.len());
        unsafe { self.columns.get_unchecked(col.index()) }
    }

    /// # Safety
    /// - `col` must be a valid column index obtained from `find_column()`.
    #[inline(always)]
    pub unsafe fn get_column_unchecked_mut(&mut self, col: TableCol) -> &mut Column {
        debug_assert!(col.index() < self.columns.len());
        unsafe { self.columns.get_unchecked_mut(col.index()) }
    }
}

// -----------------------------------------------------------------------------
// Growth, insert, remove

impl Table {
    /// Makes room for at least `additional` more rows.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.count().saturating_add(additional);
        if required > self.capacity {
            let doubled = self.capacity.saturating_mul(2);
            self.grow_exact(required.max(doubled).max(MIN_CAPACITY));
        }
    }

    #[cold]
    #[inline(never)]
    fn grow_exact(&mut self, new_capacity: usize) {
        trace!(
            "table {} grows from {} to {} rows",
            self.id,
            self.capacity,
            new_capacity
        );

        let abort_guard = AbortOnPanic("table growth failed");
        self.entities.reserve_exact(new_capacity - self.entities.len());
        self.columns
            .iter_mut()
            .for_each(|column| column.grow_exact(new_capacity));
        mem::forget(abort_guard);

        self.capacity = new_capacity;
    }

    /// Appends a row, default-initializing every column, and returns its
    /// index.
    ///
    /// The table only remembers `entity`; keeping the entity index in sync
    /// is the caller's job.
    pub(crate) fn allocate(&mut self, entity: Option<Entity>) -> TableRow {
        let len = self.count();
        if len == self.capacity {
            self.reserve(1);
        }

        self.columns.iter_mut().for_each(|column| unsafe {
            column.extend_default(1);
        });
        self.entities.push(entity);

        TableRow(len as u32)
    }

    /// Destroys the row and moves the last row into its place.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub(crate) fn swap_remove(&mut self, row: TableRow) -> RowRemoval {
        let removal = row.index();
        let removed = self.entities.swap_remove(removal);
        let moved = self.entities.get(removal).copied().flatten();

        self.columns.iter_mut().for_each(|column| unsafe {
            column.swap_remove(removal);
        });

        RowRemoval { removed, moved }
    }

    /// Moves a row into `other`, a table with a different type set.
    ///
    /// Components both tables share are relocated, components `other` lacks
    /// are destroyed, and components only `other` has are
    /// default-initialized. The hole left behind is filled with this table's
    /// last row.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    pub(crate) fn move_row_to(&mut self, row: TableRow, other: &mut Table) -> TableMove {
        let src = row.index();
        let entity = self.entities.swap_remove(src);
        let swapped = self.entities.get(src).copied().flatten();

        other.reserve(1);
        let new_row = TableRow(other.count() as u32);

        self.idents
            .iter()
            .zip(self.columns.iter_mut())
            .for_each(|(&id, column)| match other.find_column(id) {
                Some(col) => unsafe {
                    let target = other.columns.get_unchecked_mut(col.index());
                    column.move_row_to(src, target);
                },
                None => unsafe { column.swap_remove(src) },
            });

        other
            .idents
            .iter()
            .zip(other.columns.iter_mut())
            .for_each(|(&id, column)| {
                if self.find_column(id).is_none() {
                    unsafe { column.extend_default(1) };
                }
            });
        other.entities.push(entity);

        TableMove { new_row, swapped }
    }
}

// -----------------------------------------------------------------------------
// Column replacement

impl Table {
    /// Installs `column` at index `col` and returns the previous column.
    ///
    /// Ownership of the returned column passes to the caller: dropping it
    /// destroys its elements, or it can be handed back later. The new column
    /// is grown to the table's capacity if it is smaller.
    ///
    /// # Safety
    /// - `column` must store the same component as the column it replaces.
    /// - `column.len()` must equal the table's row count.
    pub unsafe fn set_column(&mut self, col: TableCol, mut column: Column) -> Column {
        let count = self.count();
        let capacity = self.capacity;
        let slot = unsafe { self.get_column_unchecked_mut(col) };

        cfg::debug! {
            assert_eq!(column.item_layout(), slot.item_layout(), "column layout does not match");
            assert_eq!(column.len(), count, "column length does not match the row count");
        }

        column.grow_exact(capacity);
        mem::replace(slot, column)
    }

    /// Destroys a column previously detached from this table.
    ///
    /// The column's elements are released with the destructor of the
    /// component stored at `col`, and its buffer is freed.
    pub fn delete_column(&self, col: TableCol, column: Column) {
        cfg::debug! {
            let slot = self.get_column(col).expect("column index out of bounds");
            assert_eq!(column.item_layout(), slot.item_layout(), "column layout does not match");
            assert_eq!(column.hooks().flags(), slot.hooks().flags(), "column hooks do not match");
        }
        drop(column);
    }
}

// -----------------------------------------------------------------------------
// Results

/// Which entities a [`Table::swap_remove`] affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRemoval {
    /// The entity whose row was destroyed.
    pub removed: Option<Entity>,
    /// The entity that moved from the last row into the freed row.
    pub moved: Option<Entity>,
}

/// Result of moving a row between tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMove {
    /// The row in the destination table.
    pub new_row: TableRow,
    /// The entity that moved into the vacated source row.
    pub swapped: Option<Entity>,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::alloc::Layout;

    use super::{TableBuilder, TableCol};
    use crate::component::{Component, ComponentHooks, Components};
    use crate::entity::Entities;
    use crate::storage::{Column, TableId, TableRow};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    unsafe impl Component for Position {}

    #[derive(Default, Debug, PartialEq)]
    struct Name(String);
    unsafe impl Component for Name {
        const HOOKS: ComponentHooks = ComponentHooks::of::<Self>().with_default::<Self>();
    }

    #[test]
    fn allocate_default_initializes_rows() {
        let mut components = Components::new();
        let pos = components.register::<Position>();
        let name = components.register::<Name>();

        let mut builder = TableBuilder::new(2);
        builder.insert(components.get(pos).unwrap());
        builder.insert(components.get(name).unwrap());
        let mut table = builder.build(TableId::new(1));

        let mut entities = Entities::new();
        let e = entities.alloc();
        assert_eq!(table.allocate(Some(e)), TableRow(0));
        assert_eq!(table.allocate(None), TableRow(1));

        assert_eq!(table.count(), 2);
        assert_eq!(table.capacity(), 4);
        assert_eq!(table.entity(TableRow(0)), Some(e));
        assert_eq!(table.entity(TableRow(1)), None);

        let col = table.find_column(pos).unwrap();
        assert_eq!(col, TableCol(0));
        assert_eq!(table.find_column(pos), Some(col));
        let positions = unsafe { table.get_column(col).unwrap().as_slice::<Position>() };
        assert_eq!(positions, [Position { x: 0.0, y: 0.0 }; 2]);

        let col = table.find_column(name).unwrap();
        let names = unsafe { table.get_column(col).unwrap().as_slice::<Name>() };
        assert_eq!(names[1], Name(String::new()));
    }

    #[test]
    fn set_column_transfers_ownership() {
        let mut components = Components::new();
        let pos = components.register::<Position>();

        let mut builder = TableBuilder::new(1);
        builder.insert(components.get(pos).unwrap());
        let mut table = builder.build(TableId::new(1));
        for _ in 0..5 {
            table.allocate(None);
        }

        let col = table.find_column(pos).unwrap();
        let mut replacement = Column::for_component(components.get(pos).unwrap());
        for _ in 0..5 {
            replacement.push_default();
        }
        unsafe {
            replacement.as_mut_slice::<Position>()[4] = Position { x: 4.0, y: 2.0 };
        }

        let old = unsafe { table.set_column(col, replacement) };
        assert_eq!(old.len(), 5);
        let column = table.get_column(col).unwrap();
        assert!(column.capacity() >= table.capacity());

        table.allocate(None);
        let positions = unsafe { table.get_column(col).unwrap().as_slice::<Position>() };
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[4], Position { x: 4.0, y: 2.0 });

        table.delete_column(col, old);
        assert_eq!(
            table.get_column(col).unwrap().item_layout(),
            Layout::new::<Position>()
        );
    }

    #[test]
    #[cfg(any(feature = "debug", debug_assertions))]
    #[should_panic(expected = "column hooks do not match")]
    fn delete_column_rejects_foreign_hooks() {
        let mut components = Components::new();
        let name = components.register::<Name>();

        let mut builder = TableBuilder::new(1);
        builder.insert(components.get(name).unwrap());
        let table = builder.build(TableId::new(1));

        let col = table.find_column(name).unwrap();
        let foreign = unsafe { Column::new(Layout::new::<Name>(), ComponentHooks::EMPTY) };
        table.delete_column(col, foreign);
    }
}
