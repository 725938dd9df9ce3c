use core::ptr::{self, NonNull};

/// Tracks a run of slots constructed one after another.
///
/// If it is dropped before [`finish`](Self::finish) is called, for example because an element
/// constructor panicked, it drops the slots that were already constructed.
pub(crate) struct InitGuard<T> {
    start: NonNull<T>,
    initialized: usize,
}

impl<T> InitGuard<T> {
    /// # Safety
    ///
    /// `start` must be valid for writes of as many `T` as will be [`push`](Self::push)ed.
    #[inline(always)]
    pub(crate) unsafe fn new(start: NonNull<T>) -> Self {
        Self { start, initialized: 0 }
    }

    /// # Safety
    ///
    /// The slot after the last pushed one must be within the buffer `start` points into.
    #[inline(always)]
    pub(crate) unsafe fn push(&mut self, value: T) {
        unsafe { self.start.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    #[inline(always)]
    pub(crate) fn initialized(&self) -> usize {
        self.initialized
    }

    /// Disarms the guard and returns how many slots were constructed.
    #[inline(always)]
    pub(crate) fn finish(self) -> usize {
        let initialized = self.initialized;
        core::mem::forget(self);
        initialized
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: the first `initialized` slots were written by `push`
        unsafe { ptr::drop_in_place(NonNull::slice_from_raw_parts(self.start, self.initialized).as_ptr()) }
    }
}
