//! Memory allocation APIs.
//!
//! A vector's memory comes from an [`Allocator`]. Besides handing out and taking back memory,
//! an allocator type declares a [`Propagation`] policy that decides what happens to the allocator
//! object itself when a vector is copied, moved or swapped.

use core::{alloc::Layout, ptr::NonNull};

mod global;
#[cfg(feature = "std")]
mod system;

pub use crate::AllocError;
pub use global::Global;
#[cfg(feature = "std")]
pub use system::System;

/// Contains wrappers that make foreign allocators usable as an [`Allocator`].
#[cfg(any(feature = "allocator-api2-02", feature = "allocator-api2-04"))]
pub mod compat {
    #[cfg(feature = "allocator-api2-02")]
    pub use crate::features::allocator_api2_02::AllocatorApi2V02Compat;
    #[cfg(feature = "allocator-api2-04")]
    pub use crate::features::allocator_api2_04::AllocatorApi2V04Compat;
}

/// Whether an allocator follows the data when a container is copied, moved or swapped.
///
/// Each [`Allocator`] type declares its policy as the associated constant [`Allocator::PROPAGATION`].
/// The storage manager consults it at every copy assignment, move assignment and swap.
///
/// # Example
/// ```
/// use contiguous_vec::alloc::Propagation;
///
/// const POLICY: Propagation = Propagation::NEVER.with_on_swap(true);
///
/// assert!(POLICY.on_swap);
/// assert!(!POLICY.on_copy_assign);
/// assert!(!POLICY.always_equal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Propagation {
    /// Copy assignment replaces the receiver's allocator with a copy of the source's.
    ///
    /// If the two allocators differ, the receiver's elements are destroyed and its buffer is freed first,
    /// because the new allocator can't free memory obtained from the old one.
    pub on_copy_assign: bool,

    /// Move assignment replaces the receiver's allocator with a copy of the source's.
    ///
    /// When this is `false` and the allocators differ, the source's buffer can't be adopted
    /// and the elements are relocated into memory from the receiver's own allocator instead.
    pub on_move_assign: bool,

    /// Swapping two containers also swaps their allocators.
    ///
    /// When this is `false` the allocators stay in place, which requires them to compare equal.
    pub on_swap: bool,

    /// All instances of the allocator type compare equal, so no runtime comparison is needed.
    pub always_equal: bool,
}

impl Propagation {
    /// Never propagate and always compare allocators at runtime.
    ///
    /// This is the default policy of [`Allocator::PROPAGATION`].
    pub const NEVER: Self = Self {
        on_copy_assign: false,
        on_move_assign: false,
        on_swap: false,
        always_equal: false,
    };

    /// Propagate on copy assignment, move assignment and swap.
    pub const ALWAYS: Self = Self {
        on_copy_assign: true,
        on_move_assign: true,
        on_swap: true,
        always_equal: false,
    };

    /// The policy of stateless allocators like [`Global`] and `System`.
    ///
    /// Only move assignment propagates and all instances compare equal.
    pub const STATELESS: Self = Self {
        on_copy_assign: false,
        on_move_assign: true,
        on_swap: false,
        always_equal: true,
    };

    /// Returns this policy with [`on_copy_assign`](Self::on_copy_assign) set to `value`.
    #[must_use]
    pub const fn with_on_copy_assign(mut self, value: bool) -> Self {
        self.on_copy_assign = value;
        self
    }

    /// Returns this policy with [`on_move_assign`](Self::on_move_assign) set to `value`.
    #[must_use]
    pub const fn with_on_move_assign(mut self, value: bool) -> Self {
        self.on_move_assign = value;
        self
    }

    /// Returns this policy with [`on_swap`](Self::on_swap) set to `value`.
    #[must_use]
    pub const fn with_on_swap(mut self, value: bool) -> Self {
        self.on_swap = value;
        self
    }

    /// Returns this policy with [`always_equal`](Self::always_equal) set to `value`.
    #[must_use]
    pub const fn with_always_equal(mut self, value: bool) -> Self {
        self.always_equal = value;
        self
    }
}

impl Default for Propagation {
    #[inline]
    fn default() -> Self {
        Self::NEVER
    }
}

/// An implementation of `Allocator` can allocate, grow, shrink, and deallocate arbitrary blocks of
/// data described via [`Layout`].
///
/// Two allocators that compare equal must be able to free each other's memory.
/// The containers of this crate rely on that when they decide whether a buffer can change hands.
///
/// # Safety
///
/// Memory blocks returned from an allocator must point to valid memory and retain their validity
/// until the block is deallocated or the allocator and every clone of it is dropped.
/// Cloning an allocator must produce an allocator that compares equal to the original.
pub unsafe trait Allocator: Clone + PartialEq {
    /// The propagation policy of this allocator type.
    const PROPAGATION: Propagation = Propagation::NEVER;

    /// Attempts to allocate a block of memory.
    ///
    /// On success, returns a [`NonNull<[u8]>`][NonNull] meeting the size and alignment guarantees of `layout`.
    /// The block may be larger than `layout.size()`; its contents are uninitialized.
    ///
    /// # Errors
    ///
    /// Returning `Err` indicates that either memory is exhausted or `layout` does not meet
    /// the allocator's size or alignment constraints.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Deallocates the memory referenced by `ptr`.
    ///
    /// # Safety
    ///
    /// * `ptr` must denote a block of memory currently allocated via this allocator, and
    /// * `layout` must fit that block of memory.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Attempts to extend the memory block.
    ///
    /// Returns a new pointer to the block. The first `old_layout.size()` bytes keep their contents.
    /// On success the old block must no longer be accessed.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the new layout does not meet the allocator's constraints or if growing otherwise fails.
    /// The old block stays valid in that case.
    ///
    /// # Safety
    ///
    /// * `ptr` must denote a block of memory currently allocated via this allocator.
    /// * `old_layout` must fit that block of memory.
    /// * `new_layout.size()` must be greater than or equal to `old_layout.size()`.
    unsafe fn grow(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        let new_ptr = self.allocate(new_layout)?;

        // SAFETY: both blocks are valid for `old_layout.size()` bytes and the new block is
        // freshly allocated so they can't overlap. The caller guarantees `ptr` belongs to `self`.
        unsafe {
            core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.cast::<u8>().as_ptr(), old_layout.size());
            self.deallocate(ptr, old_layout);
        }

        Ok(new_ptr)
    }

    /// Attempts to shrink the memory block.
    ///
    /// Returns a new pointer to the block. The first `new_layout.size()` bytes keep their contents.
    /// On success the old block must no longer be accessed.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the new layout does not meet the allocator's constraints or if shrinking otherwise fails.
    /// The old block stays valid in that case.
    ///
    /// # Safety
    ///
    /// * `ptr` must denote a block of memory currently allocated via this allocator.
    /// * `old_layout` must fit that block of memory.
    /// * `new_layout.size()` must be smaller than or equal to `old_layout.size()`.
    unsafe fn shrink(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() <= old_layout.size(),
            "`new_layout.size()` must be smaller than or equal to `old_layout.size()`"
        );

        let new_ptr = self.allocate(new_layout)?;

        // SAFETY: both blocks are valid for `new_layout.size()` bytes and the new block is
        // freshly allocated so they can't overlap. The caller guarantees `ptr` belongs to `self`.
        unsafe {
            core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.cast::<u8>().as_ptr(), new_layout.size());
            self.deallocate(ptr, old_layout);
        }

        Ok(new_ptr)
    }
}

// SAFETY: forwards to `A`
unsafe impl<A: Allocator> Allocator for &A {
    const PROPAGATION: Propagation = A::PROPAGATION;

    #[inline(always)]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        A::allocate(self, layout)
    }

    #[inline(always)]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { A::deallocate(self, ptr, layout) };
    }

    #[inline(always)]
    unsafe fn grow(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unsafe { A::grow(self, ptr, old_layout, new_layout) }
    }

    #[inline(always)]
    unsafe fn shrink(&self, ptr: NonNull<u8>, old_layout: Layout, new_layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unsafe { A::shrink(self, ptr, old_layout, new_layout) }
    }
}

/// Returns whether `a` and `b` are interchangeable, skipping the comparison for always-equal allocators.
#[inline(always)]
pub(crate) fn allocators_equal<A: Allocator>(a: &A, b: &A) -> bool {
    A::PROPAGATION.always_equal || a == b
}
