use core::{fmt, iter::FusedIterator, slice};

use crate::{ContiguousStorage, alloc::Allocator};

/// An iterator that moves out of a vector.
///
/// This `struct` is created by the `into_iter` method on [`Vector`](crate::Vector)
/// (provided by the [`IntoIterator`] trait).
///
/// The buffer is freed once the iterator is dropped, along with any elements that were not yielded.
pub struct IntoIter<T, A: Allocator> {
    storage: ContiguousStorage<T, A>,
    // slots `start..end` are live
    start: usize,
    end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// # Safety
    ///
    /// The first `len` slots of `storage` must be live.
    #[inline(always)]
    pub(super) unsafe fn new(storage: ContiguousStorage<T, A>, len: usize) -> Self {
        Self { storage, start: 0, end: len }
    }

    /// Returns the remaining items of this iterator as a slice.
    #[must_use]
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.storage.as_ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    #[must_use]
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr().add(self.start), self.end - self.start) }
    }

    /// Returns a reference to the allocator.
    #[must_use]
    #[inline(always)]
    pub fn allocator(&self) -> &A {
        self.storage.allocator()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        let index = self.start;
        self.start += 1;

        // SAFETY: the slot was live and is no longer tracked
        Some(unsafe { self.storage.as_ptr().add(index).read() })
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.end - self.start;
        (exact, Some(exact))
    }

    #[inline(always)]
    fn count(self) -> usize {
        self.len()
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;

        // SAFETY: the slot was live and is no longer tracked
        Some(unsafe { self.storage.as_ptr().add(self.end).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: the remaining slots are live; the storage frees the buffer afterwards
        unsafe { self.storage.destroy(self.start..self.end) }
    }
}
