use core::{
    alloc::{GlobalAlloc, Layout},
    ptr::NonNull,
};

use super::{
    AllocError, Allocator, Propagation,
    global::{dangling, empty_block},
};

/// The default memory allocator provided by the operating system.
///
/// Forwards to [`std::alloc::System`], regardless of which allocator is registered as the `#[global_allocator]`.
/// Like [`Global`](super::Global) it is stateless and uses [`Propagation::STATELESS`].
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct System;

#[inline]
fn alloc_impl(layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    match layout.size() {
        0 => Ok(empty_block(layout)),
        size => {
            // SAFETY: `layout` is non-zero in size
            let raw_ptr = unsafe { GlobalAlloc::alloc(&std::alloc::System, layout) };
            let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
            Ok(NonNull::slice_from_raw_parts(ptr, size))
        }
    }
}

// SAFETY: Same as `Allocator::grow` and `Allocator::shrink`.
#[inline]
unsafe fn resize_impl(ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    match (old_layout.size(), new_layout.size()) {
        (0, _) => alloc_impl(new_layout),
        (_, 0) => {
            // SAFETY: `old_layout` is non-zero in size
            unsafe { GlobalAlloc::dealloc(&std::alloc::System, ptr.as_ptr(), old_layout) };
            Ok(NonNull::slice_from_raw_parts(dangling(new_layout), 0))
        }
        (_, new_size) if old_layout.align() == new_layout.align() => {
            // SAFETY: both sizes are non-zero and the alignment doesn't change
            let raw_ptr = unsafe { GlobalAlloc::realloc(&std::alloc::System, ptr.as_ptr(), old_layout, new_size) };
            let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
            Ok(NonNull::slice_from_raw_parts(ptr, new_size))
        }
        (old_size, new_size) => {
            let new_ptr = alloc_impl(new_layout)?;

            // SAFETY: the new block was just allocated so it can't overlap the old one
            unsafe {
                core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.cast::<u8>().as_ptr(), old_size.min(new_size));
                GlobalAlloc::dealloc(&std::alloc::System, ptr.as_ptr(), old_layout);
            }

            Ok(new_ptr)
        }
    }
}

// SAFETY: forwards to `std::alloc::System` and never hands out zero-sized blocks from it
unsafe impl Allocator for System {
    const PROPAGATION: Propagation = Propagation::STATELESS;

    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        alloc_impl(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: `layout` is non-zero in size,
            // other conditions must be upheld by the caller
            unsafe { GlobalAlloc::dealloc(&std::alloc::System, ptr.as_ptr(), layout) }
        }
    }

    #[inline]
    unsafe fn grow(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        // SAFETY: all conditions must be upheld by the caller
        unsafe { resize_impl(ptr, old_layout, new_layout) }
    }

    #[inline]
    unsafe fn shrink(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() <= old_layout.size(),
            "`new_layout.size()` must be smaller than or equal to `old_layout.size()`"
        );

        // SAFETY: all conditions must be upheld by the caller
        unsafe { resize_impl(ptr, old_layout, new_layout) }
    }
}
