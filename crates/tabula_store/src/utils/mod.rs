// -----------------------------------------------------------------------------
// Modules

mod debug_unwrap;
mod short_name;

// -----------------------------------------------------------------------------
// Exports

pub use debug_unwrap::DebugCheckedUnwrap;
pub use short_name::{short_type_name, write_short_name};

// -----------------------------------------------------------------------------
// AbortOnPanic

/// A guard that aborts the process when dropped.
///
/// Armed around regions where unwinding would leave a column or table with
/// a length that does not match its initialized contents, such as running
/// component destructors or growing parallel allocations. Disarmed with
/// [`core::mem::forget`] once the region completes.
pub(crate) struct AbortOnPanic(pub &'static str);

impl Drop for AbortOnPanic {
    #[cold]
    #[inline(never)]
    fn drop(&mut self) {
        #[cfg(feature = "std")]
        {
            ::std::eprintln!("Aborting: {}.", self.0);
            ::std::process::abort();
        }
        #[cfg(not(feature = "std"))]
        {
            panic!("Aborting: {}.", self.0);
        }
    }
}
