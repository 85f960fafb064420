/// A debug checked version of [`Option::unwrap_unchecked`].
///
/// Panics when unwrapping `None` or `Err` with `debug_assertions` or the
/// `debug` feature enabled, and is equivalent to `unwrap_unchecked`
/// otherwise.
#[doc(hidden)]
pub trait DebugCheckedUnwrap {
    type Item;

    /// # Safety
    /// This must never be called on a `None` or `Err` value.
    unsafe fn debug_checked_unwrap(self) -> Self::Item;
}

impl<T> DebugCheckedUnwrap for Option<T> {
    type Item = T;

    crate::cfg::debug! {
        if {
            #[inline(always)]
            #[track_caller]
            unsafe fn debug_checked_unwrap(self) -> Self::Item {
                if let Some(inner) = self {
                    inner
                } else {
                    unreachable!()
                }
            }
        } else {
            #[inline(always)]
            unsafe fn debug_checked_unwrap(self) -> Self::Item {
                unsafe { self.unwrap_unchecked() }
            }
        }
    }
}

impl<T, U> DebugCheckedUnwrap for Result<T, U> {
    type Item = T;

    crate::cfg::debug! {
        if {
            #[inline(always)]
            #[track_caller]
            unsafe fn debug_checked_unwrap(self) -> Self::Item {
                if let Ok(inner) = self {
                    inner
                } else {
                    unreachable!()
                }
            }
        } else {
            #[inline(always)]
            unsafe fn debug_checked_unwrap(self) -> Self::Item {
                unsafe { self.unwrap_unchecked() }
            }
        }
    }
}
