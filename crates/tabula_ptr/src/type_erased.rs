use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_ptr {
    ($ptr:ident) => {
        impl From<$ptr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(ptr: $ptr<'_>) -> Self {
                ptr.0
            }
        }

        impl $ptr<'_> {
            /// Returns `true` if the address is aligned for `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Asserts alignment for `T`, compiled out without `debug_assertions`.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "pointer {:p} is not aligned to {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }

            /// Offsets the pointer by `count` bytes.
            ///
            /// # Safety
            /// - The result must stay inside the same allocation.
            /// - The result must be valid for the lifetime of this pointer.
            #[inline]
            pub const unsafe fn byte_add(self, count: usize) -> Self {
                Self(unsafe { self.0.add(count) }, PhantomData)
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A type-erased shared pointer, the erased form of `&'a T`.
///
/// The pointee must not change while this pointer is alive, and the
/// caller is responsible for using the right type and alignment when
/// reading through it.
///
/// # Examples
///
/// ```
/// # use tabula_ptr::Ptr;
/// let x = 8i32;
/// let ptr = Ptr::from_ref(&x);
/// assert_eq!(unsafe { *ptr.as_ref::<i32>() }, 8);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_ptr!(Ptr);

impl<'a> Ptr<'a> {
    /// Creates a `Ptr` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must be valid for reads for the lifetime `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Creates a `Ptr` from a reference with the same lifetime.
    ///
    /// For slices the pointer addresses the first element.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Returns the underlying raw pointer, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Converts into `&'a T`.
    ///
    /// # Safety
    /// - `T` must be the pointee type and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Ptr::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// A type-erased exclusive pointer, the erased form of `&'a mut T`.
///
/// Not `Clone`: like `&mut T`, at most one may be live for a pointee.
///
/// # Examples
///
/// ```
/// # use tabula_ptr::PtrMut;
/// let mut x = 8i32;
/// let mut ptr = PtrMut::from_mut(&mut x);
/// unsafe { *ptr.as_mut::<i32>() += 2 };
/// assert_eq!(x, 10);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Creates a `PtrMut` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must be valid for reads and writes for the lifetime `'a`.
    /// - No other pointer may access the pointee during `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Creates a `PtrMut` from a mutable reference with the same lifetime.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Returns the underlying raw pointer, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Borrows as `&T` for the lifetime of `&self`.
    ///
    /// # Safety
    /// - `T` must be the pointee type and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(&self) -> &T {
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }

    /// Borrows as `&mut T` for the lifetime of `&mut self`.
    ///
    /// # Safety
    /// - `T` must be the pointee type and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn as_mut<T>(&mut self) -> &mut T {
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Borrows as a shared [`Ptr`].
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Takes ownership of the pointee.
    ///
    /// # Safety
    /// - The pointee must be initialized, and the caller must treat the
    ///   slot as moved-from once the returned pointer is consumed.
    #[inline(always)]
    pub const unsafe fn promote(self) -> OwningPtr<'a> {
        OwningPtr(self.0, PhantomData)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        PtrMut::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// OwningPtr

/// A type-erased pointer to a value the receiver takes ownership of.
///
/// The value behind it must be consumed exactly once, by [`read`],
/// [`drop_as`], or by being copied into storage that then owns it.
///
/// [`read`]: OwningPtr::read
/// [`drop_as`]: OwningPtr::drop_as
///
/// # Examples
///
/// ```
/// # use tabula_ptr::OwningPtr;
/// let len = OwningPtr::make(String::from("hello"), |ptr| {
///     let s = unsafe { ptr.read::<String>() };
///     s.len()
/// });
/// assert_eq!(len, 5);
/// ```
#[repr(transparent)]
pub struct OwningPtr<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(OwningPtr);

impl<'a> OwningPtr<'a> {
    /// Creates an `OwningPtr` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to an initialized value valid for `'a`.
    /// - The caller hands ownership of that value to the receiver.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> OwningPtr<'a> {
        OwningPtr(ptr, PhantomData)
    }

    /// Points at a value wrapped in [`ManuallyDrop`].
    ///
    /// The caller must not use the value again after handing the
    /// pointer to a consumer.
    #[inline(always)]
    pub const fn from_value<T>(val: &'a mut ManuallyDrop<T>) -> OwningPtr<'a> {
        OwningPtr(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Moves `val` onto the stack and passes an owning pointer to `f`.
    ///
    /// If `f` does not consume the value, it leaks.
    #[inline]
    pub fn make<T, F: FnOnce(OwningPtr<'_>) -> R, R>(val: T, f: F) -> R {
        let mut val = ManuallyDrop::new(val);
        f(OwningPtr::from_value(&mut val))
    }

    /// Returns the underlying raw pointer, dropping the lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Borrows as a shared [`Ptr`].
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Reads the value out.
    ///
    /// # Safety
    /// - `T` must be the pointee type and the pointer aligned for it.
    #[inline(always)]
    pub const unsafe fn read<T>(self) -> T {
        unsafe { ptr::read(self.0.as_ptr().cast::<T>()) }
    }

    /// Drops the value in place.
    ///
    /// # Safety
    /// - `T` must be the pointee type and the pointer aligned for it.
    #[inline(always)]
    pub unsafe fn drop_as<T>(self) {
        unsafe { ptr::drop_in_place(self.0.as_ptr().cast::<T>()) }
    }
}

#[cfg(test)]
mod tests {
    use super::{OwningPtr, Ptr, PtrMut};
    use core::mem::ManuallyDrop;

    #[test]
    fn slice_pointer_addresses_first_element() {
        let values = [1u16, 2, 3];
        let ptr = Ptr::from_ref(&values[..]);
        ptr.debug_assert_aligned::<u16>();
        let second = unsafe { ptr.byte_add(size_of::<u16>()).as_ref::<u16>() };
        assert_eq!(*second, 2);
    }

    #[test]
    fn promote_then_read() {
        let mut value = ManuallyDrop::new(41u64);
        let ptr = PtrMut::from_mut(&mut *value);
        let owned = unsafe { ptr.promote() };
        assert_eq!(unsafe { owned.read::<u64>() }, 41);
    }

    #[test]
    fn owning_ptr_make_consumes_once() {
        let rc = alloc_free_counter();
        OwningPtr::make(rc, |ptr| unsafe { ptr.drop_as::<Counter>() });
        assert_eq!(DROPS.with(|d| d.get()), 1);
    }

    extern crate std;

    std::thread_local! {
        static DROPS: core::cell::Cell<u32> = const { core::cell::Cell::new(0) };
    }

    struct Counter;

    impl Drop for Counter {
        fn drop(&mut self) {
            DROPS.with(|d| d.set(d.get() + 1));
        }
    }

    fn alloc_free_counter() -> Counter {
        DROPS.with(|d| d.set(0));
        Counter
    }
}
