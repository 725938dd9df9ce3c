use allocator_api2_04::alloc::AllocError;

use crate::alloc::{AllocError as CrateAllocError, Global};

use super::allocator_util::{allocator_compat_wrapper, impl_allocator_via_allocator};

allocator_compat_wrapper! {
    /// Wraps an <code>allocator_api2::alloc::[Allocator](allocator_api2_04::alloc::Allocator)</code> (version `0.4`)
    /// so it can be used as a <code>contiguous_vec::alloc::[Allocator](crate::alloc::Allocator)</code>.
    ///
    /// The wrapper uses the default [`Propagation::NEVER`](crate::alloc::Propagation::NEVER) policy.
    ///
    /// # Example
    ///
    /// ```
    /// # use allocator_api2_04 as allocator_api2;
    /// # use core::{alloc::Layout, ptr::NonNull};
    /// # use allocator_api2::alloc::{AllocError, Global};
    /// use allocator_api2::alloc::Allocator;
    ///
    /// use contiguous_vec::{Vector, alloc::compat::AllocatorApi2V04Compat};
    ///
    /// #[derive(Clone, PartialEq)]
    /// struct MyAllocatorApi2Allocator;
    ///
    /// unsafe impl Allocator for MyAllocatorApi2Allocator {
    /// # /*
    ///     ...
    /// # */
    /// #   fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    /// #       <Global as Allocator>::allocate(&Global, layout)
    /// #   }
    /// #
    /// #   unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
    /// #       unsafe { <Global as Allocator>::deallocate(&Global, ptr, layout) }
    /// #   }
    /// }
    ///
    /// let mut vec = Vector::new_in(AllocatorApi2V04Compat(MyAllocatorApi2Allocator));
    /// vec.push(1);
    /// assert_eq!(vec, [1]);
    /// ```
    struct AllocatorApi2V04Compat for allocator_api2_04
}

impl_allocator_via_allocator! {
    self;

    use {self} for allocator_api2_04 as crate impl[] Global
}

impl From<AllocError> for CrateAllocError {
    #[inline(always)]
    fn from(_: AllocError) -> Self {
        CrateAllocError
    }
}

impl From<CrateAllocError> for AllocError {
    #[inline(always)]
    fn from(_: CrateAllocError) -> Self {
        AllocError
    }
}
