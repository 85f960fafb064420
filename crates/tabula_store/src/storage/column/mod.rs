mod blob_array;

use blob_array::BlobArray;

use core::alloc::Layout;
use core::fmt::Debug;
use core::num::NonZeroUsize;
use core::slice;

use tabula_ptr::{OwningPtr, Ptr, PtrMut};

use super::MIN_CAPACITY;
use crate::cfg;
use crate::component::{ComponentHooks, ComponentInfo};

// -----------------------------------------------------------------------------
// Column

/// A densely packed, type-erased vector of one component's values.
///
/// A column is self-describing: it keeps the element layout and the
/// component's hooks, so dropping a `Column` destroys its live elements and
/// frees its buffer exactly once, whether it is owned by a table or was
/// detached with [`Table::set_column`](super::Table::set_column).
///
/// # Examples
///
/// ```
/// # use tabula_store::storage::Column;
/// # use tabula_store::component::{Component, Components, ComponentHooks};
/// #[derive(Default)]
/// struct Name(String);
/// unsafe impl Component for Name {
///     const HOOKS: ComponentHooks = ComponentHooks::of::<Self>().with_default::<Self>();
/// }
///
/// let mut components = Components::new();
/// let id = components.register::<Name>();
///
/// let mut column = Column::for_component(components.get(id).unwrap());
/// column.push_default();
/// column.push_default();
/// assert_eq!(column.len(), 2);
/// assert!(column.capacity() >= 2);
/// assert_eq!(unsafe { column.as_slice::<Name>() }[1].0, "");
/// ```
pub struct Column {
    data: BlobArray,
    len: usize,
    capacity: usize,
}

impl Debug for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Column")
            .field("layout", &self.data.layout())
            .field("hooks", &self.data.hooks().flags())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        unsafe {
            self.data.drop_range(0, self.len);
            self.data.dealloc(self.capacity);
        }
    }
}

// SAFETY: component values are `Send + Sync`, and a column is only
// reachable through `&`/`&mut` borrows.
unsafe impl Send for Column {}
unsafe impl Sync for Column {}

// -----------------------------------------------------------------------------
// Basic methods

impl Column {
    /// Creates an empty column with no allocation.
    ///
    /// # Safety
    /// - `hooks` must operate on values of `item_layout`.
    /// - If `hooks` has no constructor, zero-filled memory must be a valid
    ///   value of the element type.
    #[inline]
    pub const unsafe fn new(item_layout: Layout, hooks: ComponentHooks) -> Self {
        Self {
            data: unsafe { BlobArray::new(item_layout, hooks) },
            len: 0,
            capacity: 0,
        }
    }

    /// Creates an empty column for a registered component.
    #[inline]
    pub fn for_component(info: &ComponentInfo) -> Self {
        // SAFETY: the registry pairs every layout with matching hooks.
        unsafe { Self::new(info.layout(), *info.hooks()) }
    }

    /// Returns the layout of individual items stored in this column.
    #[inline(always)]
    pub const fn item_layout(&self) -> Layout {
        self.data.layout()
    }

    #[inline(always)]
    pub const fn hooks(&self) -> &ComponentHooks {
        self.data.hooks()
    }

    /// Number of initialized elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold without reallocating.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a pointer to the element at `row`, if it exists.
    #[inline]
    pub fn get(&self, row: usize) -> Option<Ptr<'_>> {
        (row < self.len).then(|| unsafe { self.data.get(row) })
    }

    /// Returns a mutable pointer to the element at `row`, if it exists.
    #[inline]
    pub fn get_mut(&mut self, row: usize) -> Option<PtrMut<'_>> {
        if row < self.len {
            Some(unsafe { self.data.get_mut(row) })
        } else {
            None
        }
    }

    /// Returns a pointer to the element at `row` without bounds checking.
    ///
    /// # Safety
    /// - `row < self.len()`
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, row: usize) -> Ptr<'_> {
        debug_assert!(row < self.len);
        unsafe { self.data.get(row) }
    }

    /// Returns a mutable pointer to the element at `row` without bounds
    /// checking.
    ///
    /// # Safety
    /// - `row < self.len()`
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, row: usize) -> PtrMut<'_> {
        debug_assert!(row < self.len);
        unsafe { self.data.get_mut(row) }
    }

    /// Views the live elements as a typed slice.
    ///
    /// # Safety
    /// - `T` must be the element type of this column.
    #[inline]
    pub unsafe fn as_slice<T>(&self) -> &[T] {
        debug_assert_eq!(Layout::new::<T>(), self.item_layout());
        unsafe {
            let data = self.data.get(0);
            data.debug_assert_aligned::<T>();
            slice::from_raw_parts(data.as_ptr().cast::<T>(), self.len)
        }
    }

    /// Views the live elements as a mutable typed slice.
    ///
    /// # Safety
    /// - `T` must be the element type of this column.
    #[inline]
    pub unsafe fn as_mut_slice<T>(&mut self) -> &mut [T] {
        debug_assert_eq!(Layout::new::<T>(), self.item_layout());
        let len = self.len;
        unsafe {
            let data = self.data.get_mut(0);
            data.debug_assert_aligned::<T>();
            slice::from_raw_parts_mut(data.as_ptr().cast::<T>(), len)
        }
    }
}

// -----------------------------------------------------------------------------
// Growth

impl Column {
    /// Makes room for at least `additional` more elements.
    ///
    /// Grows geometrically: the capacity at least doubles and is never
    /// below [`MIN_CAPACITY`].
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len.checked_add(additional).unwrap_or(usize::MAX);
        if required > self.capacity {
            let doubled = self.capacity.saturating_mul(2);
            self.grow_exact(required.max(doubled).max(MIN_CAPACITY));
        }
    }

    /// Grows the buffer to hold exactly `new_capacity` elements.
    ///
    /// Does nothing if the capacity is already large enough. Existing
    /// elements are relocated bitwise.
    pub fn grow_exact(&mut self, new_capacity: usize) {
        let Some(new) = NonZeroUsize::new(new_capacity) else {
            return;
        };
        if new_capacity <= self.capacity {
            return;
        }

        unsafe {
            if let Some(current) = NonZeroUsize::new(self.capacity) {
                self.data.realloc(current, new);
            } else {
                self.data.alloc(new);
            }
        }
        self.capacity = new_capacity;
    }
}

// -----------------------------------------------------------------------------
// Push, remove

impl Column {
    /// Appends a value, taking ownership of it.
    ///
    /// # Safety
    /// - `value` must point to a valid value of the element type.
    pub unsafe fn push(&mut self, value: OwningPtr<'_>) {
        self.reserve(1);
        unsafe {
            self.data.init_item(self.len, value);
        }
        self.len += 1;
    }

    /// Appends a default-initialized element.
    ///
    /// Runs the constructor hook, or zero-fills the slot without one.
    pub fn push_default(&mut self) {
        self.reserve(1);
        unsafe {
            self.data.construct(self.len, 1);
        }
        self.len += 1;
    }

    /// Appends `count` default-initialized elements without growing.
    ///
    /// # Safety
    /// - `self.len() + count <= self.capacity()`
    #[inline]
    pub(crate) unsafe fn extend_default(&mut self, count: usize) {
        debug_assert!(self.len + count <= self.capacity);
        unsafe {
            self.data.construct(self.len, count);
        }
        self.len += count;
    }

    /// Appends a value without growing.
    ///
    /// # Safety
    /// - `self.len() < self.capacity()`
    /// - `value` must point to a valid value of the element type.
    #[inline]
    pub(crate) unsafe fn push_unchecked(&mut self, value: OwningPtr<'_>) {
        debug_assert!(self.len < self.capacity);
        unsafe {
            self.data.init_item(self.len, value);
        }
        self.len += 1;
    }

    /// Destroys the element at `row` and moves the last element into its
    /// place.
    ///
    /// # Safety
    /// - `row < self.len()`
    pub(crate) unsafe fn swap_remove(&mut self, row: usize) {
        debug_assert!(row < self.len);
        let last = self.len - 1;
        unsafe {
            if row != last {
                self.data.swap_remove_not_last(row, last);
            } else {
                self.data.drop_range(last, 1);
            }
        }
        self.len = last;
    }

    /// Moves the last element into `row`, whose value was already moved
    /// out, without running any destructor.
    ///
    /// # Safety
    /// - `row < self.len()` and the element at `row` is moved-from.
    pub(crate) unsafe fn swap_forget(&mut self, row: usize) {
        debug_assert!(row < self.len);
        let last = self.len - 1;
        if row != last {
            unsafe {
                self.data.swap_forget_not_last(row, last);
            }
        }
        self.len = last;
    }

    /// Takes ownership of the element at `row` and moves it into `other`,
    /// filling the hole with this column's last element.
    ///
    /// # Safety
    /// - `row < self.len()`
    /// - `other` must store the same component, with spare capacity.
    pub(crate) unsafe fn move_row_to(&mut self, row: usize, other: &mut Column) {
        debug_assert_eq!(self.item_layout(), other.item_layout());
        unsafe {
            other.push_unchecked(self.data.get_mut(row).promote());
            self.swap_forget(row);
        }
    }

    /// Destroys all elements, keeping the allocation.
    pub fn clear(&mut self) {
        let len = self.len;
        // Leak rather than double-drop if a destructor unwinds.
        self.len = 0;
        unsafe {
            self.data.drop_range(0, len);
        }
    }
}

// -----------------------------------------------------------------------------
// Direct access

impl Column {
    /// Clone-assigns `count` elements from `src` into `row..row + count`.
    ///
    /// Uses the cloner hook, or a memory copy for components without one.
    ///
    /// # Safety
    /// - `row + count <= self.len()`
    /// - `src` must point to `count` valid values of the element type that
    ///   do not overlap this column.
    /// - A component with a destructor but no cloner cannot be copied.
    pub unsafe fn copy_to(&mut self, row: usize, count: usize, src: Ptr<'_>) {
        cfg::debug! {
            assert!(row + count <= self.len, "copy out of bounds");
            let hooks = self.hooks();
            assert!(
                hooks.cloner.is_some() || hooks.dropper.is_none(),
                "component with a destructor has no clone hook",
            );
        }
        unsafe {
            self.data.clone_from(row, count, src);
        }
    }

    /// Copies the bytes of `count` elements from `src` into
    /// `row..row + count`, ignoring all hooks.
    ///
    /// # Safety
    /// - `row + count <= self.len()`
    /// - The component must be plain old data, see
    ///   [`HookFlags::is_pod`](crate::component::HookFlags::is_pod).
    /// - `src` must point to `count` values that do not overlap this column.
    pub unsafe fn copy_pod_to(&mut self, row: usize, count: usize, src: Ptr<'_>) {
        cfg::debug! {
            assert!(row + count <= self.len, "copy out of bounds");
            assert!(self.hooks().flags().is_pod(), "component is not plain old data");
        }
        unsafe {
            self.data.copy_from(row, count, src);
        }
    }

    /// Move-assigns `count` elements from `src` into `row..row + count`.
    ///
    /// The previous values are destroyed. The source is left moved-from:
    /// the caller must not drop or read it again, only overwrite it.
    ///
    /// # Safety
    /// - `row + count <= self.len()`
    /// - `src` must point to `count` valid values of the element type that
    ///   do not overlap this column.
    pub unsafe fn move_to(&mut self, row: usize, count: usize, src: PtrMut<'_>) {
        cfg::debug! {
            assert!(row + count <= self.len, "move out of bounds");
        }
        unsafe {
            self.data.move_from(row, count, src);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
