use core::ptr::NonNull;

use tabula_ptr::{Ptr, PtrMut};

use crate::cfg;
use crate::component::ComponentId;
use crate::entity::{Entity, Record};
use crate::storage::{Column, TableCol, TableId};
use crate::utils::DebugCheckedUnwrap;
use crate::world::World;

// -----------------------------------------------------------------------------
// Tables and columns

impl World {
    /// Number of rows in `table`, zero if it does not exist.
    #[inline]
    pub fn count(&self, table: TableId) -> usize {
        self.tables.get(table).map_or(0, |table| table.count())
    }

    /// Finds the column of `component` in `table`.
    ///
    /// The index is local to the table and never changes.
    #[inline]
    pub fn find_column(&self, table: TableId, component: ComponentId) -> Option<TableCol> {
        self.tables.get(table)?.find_column(component)
    }

    /// Returns a column for bulk inspection.
    ///
    /// Pointers read from it are invalidated by the next insert that grows
    /// the table.
    #[inline]
    pub fn get_column(&self, table: TableId, col: TableCol) -> Option<&Column> {
        self.tables.get(table)?.get_column(col)
    }

    /// Replaces a column wholesale and returns the previous one.
    ///
    /// The caller owns the returned column and disposes of it by dropping
    /// it or with [`delete_column`](Self::delete_column).
    ///
    /// # Safety
    /// - `table` and `col` must be valid.
    /// - `column` must store the component at `col`, with exactly
    ///   [`count(table)`](Self::count) elements.
    pub unsafe fn set_column(&mut self, table: TableId, col: TableCol, column: Column) -> Column {
        unsafe {
            let table = self.tables.get_unchecked_mut(table);
            table.set_column(col, column)
        }
    }

    /// Destroys a column detached from `table` at `col`.
    ///
    /// Every live element is destroyed once, in row order, then the buffer
    /// is freed. The table itself is not modified.
    pub fn delete_column(&self, table: TableId, col: TableCol, column: Column) {
        match self.tables.get(table) {
            Some(table) => table.delete_column(col, column),
            None => drop(column),
        }
    }
}

// -----------------------------------------------------------------------------
// Records

impl World {
    /// Returns where a live entity is stored.
    #[inline]
    pub fn find_record(&self, entity: Entity) -> Option<Record> {
        self.entities.find(entity)
    }

    /// Returns a pointer to a live entity's record in the index.
    ///
    /// The pointer stays valid until the entity is freed and always reflects
    /// the entity's current row.
    #[inline]
    pub fn find_record_ptr(&mut self, entity: Entity) -> Option<NonNull<Record>> {
        self.entities.find_ptr(entity)
    }

    #[inline(always)]
    unsafe fn record_column(&mut self, record: Record, col: TableCol, size: usize) -> &mut Column {
        let table = unsafe { self.tables.get_unchecked_mut(record.table) };
        let column = unsafe { table.get_column_mut(col).debug_checked_unwrap() };
        cfg::debug! {
            assert_eq!(column.item_layout().size(), size, "element size does not match column");
        }
        let _ = size;
        column
    }

    /// Clone-assigns `count` elements from `src` into the column `col`,
    /// starting at the record's row.
    ///
    /// Uses the component's clone hook, or a byte copy without one.
    ///
    /// # Safety
    /// - `record` must point into a table of this world and `col` must be
    ///   one of its columns.
    /// - `size` must be the component's size and `record.row + count` must
    ///   not exceed the table's row count.
    /// - `src` must point to `count` valid values of the component that do
    ///   not overlap the table.
    pub unsafe fn copy_to(
        &mut self,
        record: Record,
        col: TableCol,
        size: usize,
        src: Ptr<'_>,
        count: usize,
    ) {
        unsafe {
            let column = self.record_column(record, col, size);
            column.copy_to(record.row.index(), count, src);
        }
    }

    /// Copies the bytes of `count` elements from `src` into the column
    /// `col`, starting at the record's row, ignoring all hooks.
    ///
    /// # Safety
    /// Same as [`copy_to`](Self::copy_to), and the component must be plain
    /// old data.
    pub unsafe fn copy_pod_to(
        &mut self,
        record: Record,
        col: TableCol,
        size: usize,
        src: Ptr<'_>,
        count: usize,
    ) {
        unsafe {
            let column = self.record_column(record, col, size);
            column.copy_pod_to(record.row.index(), count, src);
        }
    }

    /// Move-assigns `count` elements from `src` into the column `col`,
    /// starting at the record's row.
    ///
    /// The source is left moved-from: it must be re-initialized with a raw
    /// write before it is used or dropped again.
    ///
    /// # Safety
    /// Same as [`copy_to`](Self::copy_to).
    pub unsafe fn move_to(
        &mut self,
        record: Record,
        col: TableCol,
        size: usize,
        src: PtrMut<'_>,
        count: usize,
    ) {
        unsafe {
            let column = self.record_column(record, col, size);
            column.move_to(record.row.index(), count, src);
        }
    }
}
