//! Type-erased lifecycle hooks for component columns.
//!
//! Every hook works on `count` contiguous elements so that columns can hand
//! a whole range to a single call. A missing hook means the bitwise
//! behavior is correct for that component: zeroed memory for construction,
//! `memcpy` for copy and move, nothing for destruction.

use core::ptr;

use bitflags::bitflags;
use tabula_ptr::{Ptr, PtrMut};

// -----------------------------------------------------------------------------
// Constructor

/// Initializes `count` uninitialized elements.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Constructor {
    func: unsafe fn(PtrMut<'_>, usize),
}

impl Constructor {
    /// # Safety
    /// - `dst` points to `count` uninitialized, aligned slots of `T`.
    unsafe fn construct_via_default<T: Default>(dst: PtrMut<'_>, count: usize) {
        dst.debug_assert_aligned::<T>();
        let dst = dst.as_ptr().cast::<T>();
        for index in 0..count {
            unsafe { ptr::write(dst.add(index), T::default()) };
        }
    }

    /// Creates a constructor that writes [`Default::default`] into each slot.
    pub const fn defaultable<T: Default>() -> Self {
        Self {
            func: Self::construct_via_default::<T>,
        }
    }

    /// Wraps a raw constructor for a runtime-described component.
    ///
    /// # Safety
    /// - `func` must fully initialize `count` elements of the component's
    ///   layout starting at the given pointer.
    pub const unsafe fn from_raw(func: unsafe fn(PtrMut<'_>, usize)) -> Self {
        Self { func }
    }

    #[inline(always)]
    pub(crate) unsafe fn call(self, dst: PtrMut<'_>, count: usize) {
        unsafe { (self.func)(dst, count) }
    }
}

// -----------------------------------------------------------------------------
// Cloner

/// Clone-assigns `count` elements from `src` into initialized `dst`.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Cloner {
    func: unsafe fn(PtrMut<'_>, Ptr<'_>, usize),
}

impl Cloner {
    /// # Safety
    /// - `dst` and `src` point to `count` initialized, aligned values of `T`.
    /// - The two ranges do not overlap.
    unsafe fn clone_via_clone<T: Clone>(dst: PtrMut<'_>, src: Ptr<'_>, count: usize) {
        src.debug_assert_aligned::<T>();
        dst.debug_assert_aligned::<T>();
        let src = src.as_ptr().cast::<T>();
        let dst = dst.as_ptr().cast::<T>();
        for index in 0..count {
            unsafe { (*dst.add(index)).clone_from(&*src.add(index)) };
        }
    }

    /// # Safety
    /// - `dst` and `src` point to `count` valid, aligned values of `T`.
    /// - The two ranges do not overlap.
    unsafe fn clone_via_copy<T: Copy>(dst: PtrMut<'_>, src: Ptr<'_>, count: usize) {
        src.debug_assert_aligned::<T>();
        dst.debug_assert_aligned::<T>();
        unsafe {
            ptr::copy_nonoverlapping::<T>(src.as_ptr().cast(), dst.as_ptr().cast(), count);
        }
    }

    /// Creates a cloner that uses [`Clone::clone_from`], so the old
    /// destination value is released by the type itself.
    pub const fn clonable<T: Clone>() -> Self {
        Self {
            func: Self::clone_via_clone::<T>,
        }
    }

    /// Creates a cloner that is a plain memory copy, for [`Copy`] types.
    pub const fn copyable<T: Copy>() -> Self {
        Self {
            func: Self::clone_via_copy::<T>,
        }
    }

    /// Wraps a raw cloner for a runtime-described component.
    ///
    /// # Safety
    /// - `func` must leave `count` initialized elements at the destination
    ///   equal to the source, releasing whatever the destination held.
    pub const unsafe fn from_raw(func: unsafe fn(PtrMut<'_>, Ptr<'_>, usize)) -> Self {
        Self { func }
    }

    #[inline(always)]
    pub(crate) unsafe fn call(self, dst: PtrMut<'_>, src: Ptr<'_>, count: usize) {
        unsafe { (self.func)(dst, src, count) }
    }
}

// -----------------------------------------------------------------------------
// Mover

/// Move-assigns `count` elements from `src` into initialized `dst`.
///
/// The previous destination values are destroyed and the source is left
/// logically uninitialized: it must not be dropped afterwards.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Mover {
    func: unsafe fn(PtrMut<'_>, PtrMut<'_>, usize),
}

impl Mover {
    /// # Safety
    /// - `dst` and `src` point to `count` initialized, aligned values of `T`.
    /// - The two ranges do not overlap.
    unsafe fn move_assign<T>(dst: PtrMut<'_>, src: PtrMut<'_>, count: usize) {
        src.debug_assert_aligned::<T>();
        dst.debug_assert_aligned::<T>();
        let src = src.as_ptr().cast::<T>();
        let dst = dst.as_ptr().cast::<T>();
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(dst, count));
            ptr::copy_nonoverlapping::<T>(src, dst, count);
        }
    }

    /// Returns a mover for `T`, or `None` if a bitwise copy is already a
    /// correct move-assignment (the type has no drop glue).
    pub const fn of<T>() -> Option<Mover> {
        if core::mem::needs_drop::<T>() {
            Some(Self {
                func: Self::move_assign::<T>,
            })
        } else {
            None
        }
    }

    /// Wraps a raw mover for a runtime-described component.
    ///
    /// # Safety
    /// - `func` must release the `count` destination elements and then take
    ///   over the source elements, which the caller will treat as moved-from.
    pub const unsafe fn from_raw(func: unsafe fn(PtrMut<'_>, PtrMut<'_>, usize)) -> Self {
        Self { func }
    }

    #[inline(always)]
    pub(crate) unsafe fn call(self, dst: PtrMut<'_>, src: PtrMut<'_>, count: usize) {
        unsafe { (self.func)(dst, src, count) }
    }
}

// -----------------------------------------------------------------------------
// Dropper

/// Destroys `count` initialized elements in place.
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct Dropper {
    func: unsafe fn(PtrMut<'_>, usize),
}

impl Dropper {
    /// # Safety
    /// - `ptr` points to `count` initialized, aligned values of `T`.
    unsafe fn drop_fn<T>(ptr: PtrMut<'_>, count: usize) {
        ptr.debug_assert_aligned::<T>();
        let ptr = ptr.as_ptr().cast::<T>();
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr, count)) }
    }

    /// Returns a dropper for `T`, or `None` if `T` has no drop glue.
    pub const fn of<T>() -> Option<Dropper> {
        if core::mem::needs_drop::<T>() {
            Some(Dropper {
                func: Self::drop_fn::<T>,
            })
        } else {
            None
        }
    }

    /// Wraps a raw destructor for a runtime-described component.
    ///
    /// # Safety
    /// - `func` must release `count` initialized elements of the
    ///   component's layout and leave their memory uninitialized.
    pub const unsafe fn from_raw(func: unsafe fn(PtrMut<'_>, usize)) -> Self {
        Self { func }
    }

    #[inline(always)]
    pub(crate) unsafe fn call(self, ptr: PtrMut<'_>, count: usize) {
        unsafe { (self.func)(ptr, count) }
    }
}

// -----------------------------------------------------------------------------
// HookFlags

bitflags! {
    /// Which lifecycle hooks a component has registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HookFlags: u8 {
        const CONSTRUCTOR = 1 << 0;
        const CLONER = 1 << 1;
        const MOVER = 1 << 2;
        const DROPPER = 1 << 3;
    }
}

impl HookFlags {
    /// Hooks that make a plain `memcpy` of the element incorrect.
    ///
    /// Both exist exactly when the type has drop glue. A cloner alone does
    /// not count: without drop glue a byte copy is a valid clone.
    pub const NON_TRIVIAL: Self = Self::MOVER.union(Self::DROPPER);

    /// Returns `true` if elements can be copied and moved as plain bytes.
    #[inline]
    pub const fn is_pod(self) -> bool {
        !self.intersects(Self::NON_TRIVIAL)
    }
}

// -----------------------------------------------------------------------------
// ComponentHooks

/// The lifecycle hook table of one component type.
///
/// Built once per component and copied into every column of that
/// component, so column operations dispatch without consulting the
/// registry.
///
/// # Examples
///
/// ```
/// use tabula_store::component::{ComponentHooks, HookFlags};
///
/// let hooks = ComponentHooks::of::<String>().with_default::<String>().with_clone::<String>();
/// assert_eq!(hooks.flags(), HookFlags::all());
///
/// let hooks = ComponentHooks::of::<[f32; 2]>().with_copy::<[f32; 2]>();
/// assert!(hooks.flags().is_pod());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentHooks {
    pub constructor: Option<Constructor>,
    pub cloner: Option<Cloner>,
    pub mover: Option<Mover>,
    pub dropper: Option<Dropper>,
}

impl ComponentHooks {
    /// No hooks: the component is plain old data.
    pub const EMPTY: Self = Self {
        constructor: None,
        cloner: None,
        mover: None,
        dropper: None,
    };

    /// The hooks every `T` needs: a destructor and a move-assignment if
    /// `T` has drop glue.
    pub const fn of<T>() -> Self {
        Self {
            constructor: None,
            cloner: None,
            mover: Mover::of::<T>(),
            dropper: Dropper::of::<T>(),
        }
    }

    /// Adds a constructor based on [`Default`].
    pub const fn with_default<T: Default>(mut self) -> Self {
        self.constructor = Some(Constructor::defaultable::<T>());
        self
    }

    /// Adds a cloner based on [`Clone`].
    pub const fn with_clone<T: Clone>(mut self) -> Self {
        self.cloner = Some(Cloner::clonable::<T>());
        self
    }

    /// Adds a bitwise cloner for [`Copy`] types.
    pub const fn with_copy<T: Copy>(mut self) -> Self {
        self.cloner = Some(Cloner::copyable::<T>());
        self
    }

    /// Returns which hooks are present.
    pub fn flags(&self) -> HookFlags {
        let mut flags = HookFlags::empty();
        flags.set(HookFlags::CONSTRUCTOR, self.constructor.is_some());
        flags.set(HookFlags::CLONER, self.cloner.is_some());
        flags.set(HookFlags::MOVER, self.mover.is_some());
        flags.set(HookFlags::DROPPER, self.dropper.is_some());
        flags
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use core::mem::MaybeUninit;

    use tabula_ptr::{Ptr, PtrMut};

    use super::{ComponentHooks, HookFlags};

    #[test]
    fn flags_follow_drop_glue() {
        assert_eq!(ComponentHooks::of::<u64>().flags(), HookFlags::empty());
        assert_eq!(
            ComponentHooks::of::<String>().flags(),
            HookFlags::MOVER | HookFlags::DROPPER
        );
        assert!(!ComponentHooks::of::<String>().flags().is_pod());
        let hooks = ComponentHooks::of::<u8>().with_default::<u8>();
        assert!(hooks.flags().is_pod());
    }

    #[test]
    fn copy_cloner_is_plain_old_data() {
        let flags = ComponentHooks::of::<[f32; 2]>().with_copy::<[f32; 2]>().flags();
        assert_eq!(flags, HookFlags::CLONER);
        assert!(flags.is_pod());

        let flags = ComponentHooks::of::<String>().with_clone::<String>().flags();
        assert!(!flags.is_pod());
    }

    #[test]
    fn construct_then_clone_then_drop() {
        let hooks = ComponentHooks::of::<String>()
            .with_default::<String>()
            .with_clone::<String>();

        let mut slots: [MaybeUninit<String>; 2] = [const { MaybeUninit::uninit() }; 2];
        let source = ["a".to_string(), "b".to_string()];

        unsafe {
            let ctor = hooks.constructor.unwrap();
            ctor.call(PtrMut::from_mut(&mut slots[..]), 2);
            assert_eq!(slots[1].assume_init_ref(), "");

            let cloner = hooks.cloner.unwrap();
            let dst = PtrMut::from_mut(&mut slots[..]);
            cloner.call(dst, Ptr::from_ref(&source[..]), 2);
            assert_eq!(slots[0].assume_init_ref(), "a");
            assert_eq!(slots[1].assume_init_ref(), "b");

            hooks.dropper.unwrap().call(PtrMut::from_mut(&mut slots[..]), 2);
        }
    }

    #[test]
    fn move_assign_releases_destination() {
        let mover = ComponentHooks::of::<String>().mover.unwrap();

        let mut dst = MaybeUninit::new("old".to_string());
        let mut src = MaybeUninit::new("new".to_string());

        unsafe {
            mover.call(PtrMut::from_mut(&mut dst), PtrMut::from_mut(&mut src), 1);
            assert_eq!(dst.assume_init_ref(), "new");
            dst.assume_init_drop();
        }
    }
}
