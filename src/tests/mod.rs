#![cfg(feature = "panic-on-alloc")]

use core::{alloc::Layout, cell::RefCell, ptr::NonNull};
use std::{collections::HashSet, rc::Rc};

use crate::alloc::{AllocError, Allocator, Global, Propagation};

mod cursor;
mod panic_safety;
mod propagation;
mod zst;

/// Allocates from [`Global`] and remembers which blocks it handed out.
///
/// Instances compare equal by `id`. Clones share the set of live blocks.
/// Deallocating a block that was not allocated by this instance or one of its clones panics,
/// which catches memory being freed by the wrong allocator.
#[derive(Debug, Clone)]
pub(crate) struct Tagged<const COPY: bool, const MOVE: bool, const SWAP: bool> {
    id: u32,
    live: Rc<RefCell<HashSet<usize>>>,
}

/// Never propagates.
pub(crate) type Pinned = Tagged<false, false, false>;

/// Propagates on copy assignment, move assignment and swap.
pub(crate) type Roaming = Tagged<true, true, true>;

impl<const COPY: bool, const MOVE: bool, const SWAP: bool> Tagged<COPY, MOVE, SWAP> {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            live: Rc::default(),
        }
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn live_allocations(&self) -> usize {
        self.live.borrow().len()
    }
}

impl<const COPY: bool, const MOVE: bool, const SWAP: bool> PartialEq for Tagged<COPY, MOVE, SWAP> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

unsafe impl<const COPY: bool, const MOVE: bool, const SWAP: bool> Allocator for Tagged<COPY, MOVE, SWAP> {
    const PROPAGATION: Propagation = Propagation::NEVER
        .with_on_copy_assign(COPY)
        .with_on_move_assign(MOVE)
        .with_on_swap(SWAP);

    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let block = Global.allocate(layout)?;

        if layout.size() != 0 {
            self.live.borrow_mut().insert(block.cast::<u8>().as_ptr().addr());
        }

        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            assert!(
                self.live.borrow_mut().remove(&ptr.as_ptr().addr()),
                "allocator {} freed a block it didn't allocate",
                self.id
            );
        }

        unsafe { Global.deallocate(ptr, layout) };
    }
}

/// Counts how often values are dropped.
#[derive(Debug, Clone, Default)]
pub(crate) struct DropCounter {
    drops: Rc<core::cell::Cell<usize>>,
}

impl DropCounter {
    pub(crate) fn token(&self) -> Token {
        Token(self.drops.clone())
    }

    pub(crate) fn drops(&self) -> usize {
        self.drops.get()
    }
}

/// Increments its [`DropCounter`] when dropped.
#[derive(Debug, Clone)]
pub(crate) struct Token(Rc<core::cell::Cell<usize>>);

impl Drop for Token {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
