use std::{
    alloc::Layout,
    cell::{Ref, RefCell},
    collections::HashMap,
    ptr::NonNull,
    rc::Rc,
};

use contiguous_vec::alloc::{AllocError, Allocator, Propagation};

/// Records every live allocation so tests can check for leaks and foreign frees.
///
/// Clones share the record. Two instances compare equal if they share it.
#[derive(Clone)]
pub(crate) struct InstrumentedAllocator<A: Allocator> {
    allocator: A,
    allocations: Rc<RefCell<HashMap<NonNull<u8>, Layout>>>,
}

impl<A: Allocator> InstrumentedAllocator<A> {
    pub(crate) fn new(allocator: A) -> Self {
        Self {
            allocator,
            allocations: Rc::default(),
        }
    }

    pub(crate) fn leaks(&self) -> Ref<'_, HashMap<NonNull<u8>, Layout>> {
        self.allocations.borrow()
    }
}

impl<A: Allocator> PartialEq for InstrumentedAllocator<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.allocations, &other.allocations)
    }
}

unsafe impl<A: Allocator> Allocator for InstrumentedAllocator<A> {
    const PROPAGATION: Propagation = Propagation::ALWAYS;

    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = self.allocator.allocate(layout)?.cast();
        self.allocations.borrow_mut().insert(ptr, layout);
        // don't return a bigger slice than requested
        let slice = NonNull::slice_from_raw_parts(ptr, layout.size());
        Ok(slice)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let found = self.allocations.borrow_mut().remove(&ptr).expect("foreign ptr");
        assert_eq!(found, layout, "deallocated with a different layout");
        unsafe { self.allocator.deallocate(ptr, layout) };
    }
}
