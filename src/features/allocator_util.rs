macro_rules! allocator_compat_wrapper {
    (
        $(#[$attr:meta])*
        struct $struct:ident for $foreign:ident
    ) => {
        $(#[$attr])*
        #[repr(transparent)]
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $struct<A>(pub A);

        impl_allocator_via_allocator! {
            self;

            use {&self.0} for crate as $foreign impl[A] $struct<A>
            where [A: $foreign::alloc::Allocator + Clone + PartialEq]
        }

    };
}

macro_rules! impl_allocator_via_allocator {
    (
        $self:ident;
        $(
            $(#[$attr:meta])*
            use {$accessor:expr} for $target_crate:ident as $source_crate:ident
            impl [$($($args:tt)+)?]
            $ty:ty
            $(where [$($bounds:tt)*])?
        )*
    ) => {
        $(
            const _: () = {
                use core::{alloc::Layout, ptr::NonNull};

                use $target_crate::alloc::{
                    Allocator as TargetAllocator,
                    AllocError as TargetAllocError,
                };

                use $source_crate::alloc::Allocator as SourceAllocator;

                $(#[$attr])*
                // SAFETY: forwards to an allocator that upholds the same contract
                unsafe impl $(<$($args)*>)? TargetAllocator for $ty
                $(where $($bounds)*)?
                {
                    #[inline(always)]
                    fn allocate(&$self, layout: Layout) -> Result<NonNull<[u8]>, TargetAllocError> {
                        SourceAllocator::allocate($accessor, layout).map_err(Into::into)
                    }

                    #[inline(always)]
                    unsafe fn deallocate(&$self, ptr: NonNull<u8>, layout: Layout) {
                        unsafe { SourceAllocator::deallocate($accessor, ptr, layout) };
                    }

                    #[inline(always)]
                    unsafe fn grow(
                        &$self,
                        ptr: NonNull<u8>,
                        old_layout: Layout,
                        new_layout: Layout,
                    ) -> Result<NonNull<[u8]>, TargetAllocError> {
                        unsafe { SourceAllocator::grow($accessor, ptr, old_layout, new_layout).map_err(Into::into) }
                    }

                    #[inline(always)]
                    unsafe fn shrink(
                        &$self,
                        ptr: NonNull<u8>,
                        old_layout: Layout,
                        new_layout: Layout,
                    ) -> Result<NonNull<[u8]>, TargetAllocError> {
                        unsafe { SourceAllocator::shrink($accessor, ptr, old_layout, new_layout).map_err(Into::into) }
                    }
                }
            };
        )*
    };
}

pub(crate) use allocator_compat_wrapper;
pub(crate) use impl_allocator_via_allocator;
