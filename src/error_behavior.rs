use core::alloc::Layout;

#[cfg(feature = "panic-on-alloc")]
use core::convert::Infallible;

use crate::AllocError;
#[cfg(feature = "panic-on-alloc")]
use crate::capacity_overflow;

/// Decides what a failed allocation turns into.
///
/// `Infallible` panics (or calls the allocation error handler), `AllocError` is returned to the caller.
pub(crate) trait ErrorBehavior: Sized {
    fn allocation(layout: Layout) -> Self;
    fn capacity_overflow() -> Self;
}

#[cfg(feature = "panic-on-alloc")]
impl ErrorBehavior for Infallible {
    #[inline(always)]
    fn allocation(layout: Layout) -> Self {
        alloc_crate::alloc::handle_alloc_error(layout)
    }

    #[inline(always)]
    fn capacity_overflow() -> Self {
        capacity_overflow()
    }
}

impl ErrorBehavior for AllocError {
    #[inline(always)]
    fn allocation(_: Layout) -> Self {
        Self
    }

    #[inline(always)]
    fn capacity_overflow() -> Self {
        Self
    }
}
