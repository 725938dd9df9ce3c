#![allow(clippy::unused_self)]

use alloc_crate::alloc::{alloc, dealloc, realloc};
use core::{alloc::Layout, ptr::NonNull};

use super::{AllocError, Allocator, Propagation};

/// The global memory allocator.
///
/// This type implements the [`Allocator`] trait by forwarding calls
/// to the allocator registered with the `#[global_allocator]` attribute
/// if there is one, or the `std` crate's default.
///
/// It is stateless, so its [propagation policy](Propagation::STATELESS) never requires a runtime comparison.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Global;

#[inline(always)]
pub(super) fn dangling(layout: Layout) -> NonNull<u8> {
    // SAFETY: an alignment is never zero
    unsafe { NonNull::new_unchecked(core::ptr::without_provenance_mut(layout.align())) }
}

#[inline(always)]
pub(super) fn empty_block(layout: Layout) -> NonNull<[u8]> {
    NonNull::slice_from_raw_parts(dangling(layout), 0)
}

impl Global {
    // SAFETY: Same as `Allocator::grow` and `Allocator::shrink`,
    // with `new_layout.size() != 0` and equal alignments.
    #[inline]
    unsafe fn realloc_impl(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert_eq!(old_layout.align(), new_layout.align());
        debug_assert_ne!(new_layout.size(), 0);

        // SAFETY: conditions upheld by the caller
        let raw_ptr = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
        let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
        Ok(NonNull::slice_from_raw_parts(ptr, new_layout.size()))
    }
}

// SAFETY: forwards to the global allocator and never hands out zero-sized blocks from it
unsafe impl Allocator for Global {
    const PROPAGATION: Propagation = Propagation::STATELESS;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        match layout.size() {
            0 => Ok(empty_block(layout)),
            // SAFETY: `layout` is non-zero in size
            size => {
                let ptr = NonNull::new(unsafe { alloc(layout) }).ok_or(AllocError)?;
                Ok(NonNull::slice_from_raw_parts(ptr, size))
            }
        }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: non-zero sized blocks come from `alloc` or `realloc` with exactly this layout
            unsafe { dealloc(ptr.as_ptr(), layout) }
        }
    }

    #[inline]
    unsafe fn grow(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        match old_layout.size() {
            0 => self.allocate(new_layout),
            // SAFETY: `new_layout.size()` is at least `old_layout.size()` which is non-zero
            _ if old_layout.align() == new_layout.align() => unsafe { self.realloc_impl(ptr, old_layout, new_layout) },
            old_size => {
                let new_ptr = self.allocate(new_layout)?;

                // SAFETY: the new block was just allocated so it can't overlap the old one
                unsafe {
                    core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.cast::<u8>().as_ptr(), old_size);
                    self.deallocate(ptr, old_layout);
                }

                Ok(new_ptr)
            }
        }
    }

    #[inline]
    unsafe fn shrink(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() <= old_layout.size(),
            "`new_layout.size()` must be smaller than or equal to `old_layout.size()`"
        );

        match new_layout.size() {
            0 => {
                // SAFETY: conditions upheld by the caller
                unsafe { self.deallocate(ptr, old_layout) };
                Ok(empty_block(new_layout))
            }
            // SAFETY: `new_layout.size()` is non-zero
            _ if old_layout.align() == new_layout.align() => unsafe { self.realloc_impl(ptr, old_layout, new_layout) },
            new_size => {
                let new_ptr = self.allocate(new_layout)?;

                // SAFETY: the new block was just allocated so it can't overlap the old one
                unsafe {
                    core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.cast::<u8>().as_ptr(), new_size);
                    self.deallocate(ptr, old_layout);
                }

                Ok(new_ptr)
            }
        }
    }
}
