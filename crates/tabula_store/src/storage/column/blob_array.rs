use alloc::alloc as malloc;
use core::alloc::Layout;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};

use tabula_ptr::{OwningPtr, Ptr, PtrMut};

use crate::component::ComponentHooks;
use crate::utils::AbortOnPanic;

// -----------------------------------------------------------------------------
// BlobArray

/// Raw, type-erased storage for elements of one layout.
///
/// Does not track its capacity or which slots are initialized; the owning
/// [`Column`](super::Column) does. Every lifecycle operation dispatches
/// through the hooks captured at construction.
#[derive(Debug)]
pub(super) struct BlobArray {
    item_layout: Layout,
    data: NonNull<u8>,
    hooks: ComponentHooks,
}

impl BlobArray {
    #[inline(always)]
    const fn is_zst(&self) -> bool {
        self.item_layout.size() == 0
    }

    #[inline(always)]
    pub const fn layout(&self) -> Layout {
        self.item_layout
    }

    #[inline(always)]
    pub const fn hooks(&self) -> &ComponentHooks {
        &self.hooks
    }

    /// Creates a new unallocated `BlobArray`.
    ///
    /// # Safety
    /// - `hooks` must operate on values of `item_layout`.
    #[inline(always)]
    pub const unsafe fn new(item_layout: Layout, hooks: ComponentHooks) -> Self {
        let align = unsafe { NonZeroUsize::new_unchecked(item_layout.align()) };

        Self {
            item_layout,
            hooks,
            data: NonNull::without_provenance(align),
        }
    }

    /// Allocates memory for the specified capacity.
    ///
    /// # Safety
    /// - The array must not be already allocated.
    pub unsafe fn alloc(&mut self, capacity: NonZeroUsize) {
        if !self.is_zst() {
            let new_layout = array_layout(self.item_layout, capacity.get());

            self.data = NonNull::new(unsafe { malloc::alloc(new_layout) })
                .unwrap_or_else(|| malloc::handle_alloc_error(new_layout));
        }
    }

    /// Reallocates memory from current capacity to new capacity.
    ///
    /// Elements are relocated bitwise, which is a valid move for every
    /// component.
    ///
    /// # Safety
    /// - The array must be already allocated with `current_capacity`.
    pub unsafe fn realloc(&mut self, current_capacity: NonZeroUsize, new_capacity: NonZeroUsize) {
        if !self.is_zst() {
            let new_layout = array_layout(self.item_layout, new_capacity.get());

            self.data = NonNull::new(unsafe {
                malloc::realloc(
                    self.data.as_ptr(),
                    array_layout_unchecked(self.item_layout, current_capacity.get()),
                    new_layout.size(),
                )
            })
            .unwrap_or_else(|| malloc::handle_alloc_error(new_layout));
        }
    }

    /// Deallocates memory, zero capacity is valid.
    ///
    /// Note that this function does **not** run destructors.
    ///
    /// # Safety
    /// - `current_capacity` must be the current allocated capacity.
    /// - All items must already be destroyed or moved out.
    pub unsafe fn dealloc(&mut self, current_capacity: usize) {
        if current_capacity != 0 && !self.is_zst() {
            unsafe {
                let layout = array_layout_unchecked(self.item_layout, current_capacity);
                malloc::dealloc(self.data.as_ptr(), layout);
            }
        }
    }

    #[inline(always)]
    unsafe fn slot(&self, index: usize) -> NonNull<u8> {
        unsafe { self.data.add(index * self.item_layout.size()) }
    }

    /// # Safety
    /// - `index` must be within the allocated capacity.
    #[inline(always)]
    pub unsafe fn get(&self, index: usize) -> Ptr<'_> {
        unsafe { Ptr::new(self.slot(index)) }
    }

    /// # Safety
    /// - `index` must be within the allocated capacity.
    #[inline(always)]
    pub unsafe fn get_mut(&mut self, index: usize) -> PtrMut<'_> {
        unsafe { PtrMut::new(self.slot(index)) }
    }

    /// Moves `value` into an uninitialized slot.
    ///
    /// # Safety
    /// - `index` must be within capacity and the slot uninitialized.
    /// - `value` must be a valid instance of the stored type.
    #[inline(always)]
    pub unsafe fn init_item(&mut self, index: usize, value: OwningPtr<'_>) {
        let size = self.item_layout.size();
        unsafe {
            ptr::copy_nonoverlapping::<u8>(value.as_ptr(), self.slot(index).as_ptr(), size);
        }
    }

    /// Default-initializes `count` uninitialized slots from `index`.
    ///
    /// Uses the constructor hook, or zero-fills the memory without one.
    ///
    /// # Safety
    /// - `index..index + count` must be within capacity and uninitialized.
    pub unsafe fn construct(&mut self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        unsafe {
            let dst = self.slot(index);
            if let Some(constructor) = self.hooks.constructor {
                let guard = AbortOnPanic("component constructor panicked");
                constructor.call(PtrMut::new(dst), count);
                ::core::mem::forget(guard);
            } else {
                ptr::write_bytes::<u8>(dst.as_ptr(), 0, count * self.item_layout.size());
            }
        }
    }

    /// Destroys `count` items from `index`, leaving the slots uninitialized.
    ///
    /// # Safety
    /// - `index..index + count` must be within capacity and initialized.
    pub unsafe fn drop_range(&mut self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        if let Some(dropper) = self.hooks.dropper {
            let guard = AbortOnPanic("component destructor panicked");
            unsafe { dropper.call(PtrMut::new(self.slot(index)), count) };
            ::core::mem::forget(guard);
        }
    }

    /// Replaces the item at `index` with the last item.
    ///
    /// The removed value is destroyed, then the last item is relocated into
    /// its slot; the last slot becomes uninitialized.
    ///
    /// # Safety
    /// - `index < last_index`, both within capacity and initialized.
    pub unsafe fn swap_remove_not_last(&mut self, index: usize, last_index: usize) {
        debug_assert!(index < last_index);
        unsafe {
            let dst = self.slot(index);
            let src = self.slot(last_index);
            if let Some(mover) = self.hooks.mover {
                let guard = AbortOnPanic("component move hook panicked");
                mover.call(PtrMut::new(dst), PtrMut::new(src), 1);
                ::core::mem::forget(guard);
            } else {
                self.drop_range(index, 1);
                ptr::copy_nonoverlapping::<u8>(src.as_ptr(), dst.as_ptr(), self.item_layout.size());
            }
        }
    }

    /// Relocates the last item into the uninitialized slot at `index`.
    ///
    /// # Safety
    /// - `index < last_index`, both within capacity.
    /// - The slot at `index` is uninitialized (moved out), the last is not.
    #[inline]
    pub unsafe fn swap_forget_not_last(&mut self, index: usize, last_index: usize) {
        debug_assert!(index < last_index);
        unsafe {
            let dst = self.slot(index);
            let src = self.slot(last_index);
            ptr::copy_nonoverlapping::<u8>(src.as_ptr(), dst.as_ptr(), self.item_layout.size());
        }
    }

    /// Clone-assigns `count` items from `src` into initialized slots.
    ///
    /// Falls back to a plain memory copy without a cloner hook.
    ///
    /// # Safety
    /// - `index..index + count` must be within capacity and initialized.
    /// - `src` must point to `count` valid values that do not overlap.
    pub unsafe fn clone_from(&mut self, index: usize, count: usize, src: Ptr<'_>) {
        unsafe {
            let dst = self.slot(index);
            if let Some(cloner) = self.hooks.cloner {
                let guard = AbortOnPanic("component clone hook panicked");
                cloner.call(PtrMut::new(dst), src, count);
                ::core::mem::forget(guard);
            } else {
                self.copy_from(index, count, src);
            }
        }
    }

    /// Copies the bytes of `count` items from `src`.
    ///
    /// # Safety
    /// - `index..index + count` must be within capacity.
    /// - `src` must point to `count` values that do not overlap.
    #[inline]
    pub unsafe fn copy_from(&mut self, index: usize, count: usize, src: Ptr<'_>) {
        unsafe {
            let size = self.item_layout.size();
            ptr::copy_nonoverlapping::<u8>(src.as_ptr(), self.slot(index).as_ptr(), count * size);
        }
    }

    /// Move-assigns `count` items from `src` into initialized slots.
    ///
    /// Without a move hook the current values are destroyed and the source
    /// bytes copied. Either way the source is left moved-from.
    ///
    /// # Safety
    /// - `index..index + count` must be within capacity and initialized.
    /// - `src` must point to `count` valid values that do not overlap.
    pub unsafe fn move_from(&mut self, index: usize, count: usize, src: PtrMut<'_>) {
        unsafe {
            let dst = self.slot(index);
            if let Some(mover) = self.hooks.mover {
                let guard = AbortOnPanic("component move hook panicked");
                mover.call(PtrMut::new(dst), src, count);
                ::core::mem::forget(guard);
            } else {
                self.drop_range(index, count);
                self.copy_from(index, count, src.borrow());
            }
        }
    }
}

// -----------------------------------------------------------------------------
// alloc helper

/// Creates a layout for an array with `n` elements, checking for overflow.
#[inline]
const fn array_layout(layout: Layout, n: usize) -> Layout {
    #[cold]
    #[inline(never)]
    const fn invalid_size() -> ! {
        panic!("invalid size in `Layout::from_size_align`");
    }

    let Some(alloc_size) = layout.size().checked_mul(n) else {
        invalid_size();
    };

    if alloc_size > isize::MAX as usize {
        invalid_size();
    }

    unsafe { Layout::from_size_align_unchecked(alloc_size, layout.align()) }
}

/// Creates a layout for an array with `n` elements without checking.
///
/// # Safety
/// - `layout.size() * n` must not overflow and must be <= `isize::MAX`.
#[inline]
const unsafe fn array_layout_unchecked(layout: Layout, n: usize) -> Layout {
    unsafe { Layout::from_size_align_unchecked(layout.size() * n, layout.align()) }
}
