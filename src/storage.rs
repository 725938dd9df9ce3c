use core::{
    alloc::Layout,
    fmt,
    marker::PhantomData,
    mem,
    ops::Range,
    ptr::{self, NonNull},
};

use crate::{
    AllocatorMismatchOnSwap, Cursor, SizedTypeProperties,
    alloc::{Allocator, Global, allocators_equal},
    error_behavior_generic_methods,
    init_guard::InitGuard,
    trace_event,
};

/// Owns one buffer of `T` slots together with the allocator it came from.
///
/// The storage knows how many slots it has but not which of them hold live values.
/// Its owner keeps track of that and uses the `unsafe` construction helpers to build and destroy slots.
/// Dropping a storage frees its buffer without running any element destructors.
///
/// The storage also implements the allocator propagation algorithm. Every decision it makes follows
/// [`A::PROPAGATION`](Allocator::PROPAGATION).
///
/// Zero-sized `T` never touch the allocator. Their capacity is still tracked as a plain count.
///
/// # Example
/// ```
/// use contiguous_vec::ContiguousStorage;
///
/// let mut storage: ContiguousStorage<String> = ContiguousStorage::with_capacity(3);
/// assert_eq!(storage.capacity(), 3);
///
/// unsafe {
///     storage.uninitialized_fill_n(0, 3, &String::from("hi"));
///     assert_eq!(*storage.as_ptr().add(2), "hi");
///     storage.destroy(0..3);
/// }
///
/// storage.deallocate();
/// assert!(!storage.is_allocated());
/// ```
pub struct ContiguousStorage<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    capacity: usize,
    allocator: A,
    marker: PhantomData<T>,
}

// SAFETY: the storage uniquely owns its buffer like a `Box<[T]>` would
unsafe impl<T: Send, A: Allocator + Send> Send for ContiguousStorage<T, A> {}
// SAFETY: shared access to the storage only hands out shared access to the buffer
unsafe impl<T: Sync, A: Allocator + Sync> Sync for ContiguousStorage<T, A> {}

impl<T> ContiguousStorage<T, Global> {
    /// Creates a storage without a buffer that uses the global allocator.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a storage with exactly `capacity` slots from the global allocator.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    #[inline]
    #[must_use]
    #[cfg(feature = "panic-on-alloc")]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T> Default for ContiguousStorage<T, Global> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> ContiguousStorage<T, A> {
    /// Creates a storage without a buffer that will allocate from `allocator`.
    #[inline]
    #[must_use]
    pub const fn new_in(allocator: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            allocator,
            marker: PhantomData,
        }
    }

    /// Creates a storage without a buffer that allocates from a copy of `other`'s allocator.
    #[inline]
    #[must_use]
    pub fn with_allocator_of(other: &Self) -> Self {
        Self::new_in(other.allocator.clone())
    }

    error_behavior_generic_methods! {
        /// Creates a storage with exactly `capacity` slots from `allocator`.
        ///
        /// A `capacity` of zero does not allocate.
        impl
        for fn with_capacity_in
        for fn try_with_capacity_in
        use fn generic_with_capacity_in(capacity: usize, allocator: A) -> Self {
            let mut storage = Self::new_in(allocator);
            storage.generic_allocate::<E>(capacity)?;
            Ok(storage)
        }

        /// Makes the storage own a buffer of exactly `capacity` slots.
        ///
        /// A buffer that is still held is released first, so the caller must have destroyed
        /// its live slots already. A `capacity` of zero leaves the storage without a buffer.
        /// If the allocation fails the storage is left without a buffer.
        impl
        for fn allocate
        for fn try_allocate
        use fn generic_allocate(&mut self, capacity: usize) {
            self.deallocate();

            if capacity == 0 {
                return Ok(());
            }

            if T::IS_ZST {
                if capacity > T::MAX_SLOTS {
                    return Err(E::capacity_overflow());
                }

                self.capacity = capacity;
                return Ok(());
            }

            let layout = Self::layout_for::<E>(capacity)?;
            let block = self.allocator.allocate(layout).map_err(|_| E::allocation(layout))?;

            self.ptr = block.cast();
            self.capacity = capacity;

            trace_event!(capacity, bytes = layout.size(), "allocated buffer");
            Ok(())
        }

        /// Moves the buffer's contents to a buffer of exactly `new_capacity` slots.
        ///
        /// Slots are relocated bitwise, so the caller must have destroyed every live slot at or after `new_capacity`.
        /// Reallocating from zero slots allocates and reallocating to zero slots deallocates.
        /// If the allocation fails the storage is unchanged.
        impl
        for fn reallocate
        for fn try_reallocate
        use fn generic_reallocate(&mut self, new_capacity: usize) {
            let old_capacity = self.capacity;

            if new_capacity == old_capacity {
                return Ok(());
            }

            if old_capacity == 0 {
                return self.generic_allocate(new_capacity);
            }

            if new_capacity == 0 {
                self.deallocate();
                return Ok(());
            }

            if T::IS_ZST {
                if new_capacity > T::MAX_SLOTS {
                    return Err(E::capacity_overflow());
                }

                self.capacity = new_capacity;
                return Ok(());
            }

            let old_layout = self.buffer_layout();
            let new_layout = Self::layout_for::<E>(new_capacity)?;

            // SAFETY: `ptr` was allocated by `allocator` with `old_layout`
            let block = unsafe {
                if new_capacity > old_capacity {
                    self.allocator.grow(self.ptr.cast(), old_layout, new_layout)
                } else {
                    self.allocator.shrink(self.ptr.cast(), old_layout, new_layout)
                }
            }
            .map_err(|_| E::allocation(new_layout))?;

            self.ptr = block.cast();
            self.capacity = new_capacity;

            trace_event!(old_capacity, new_capacity, "reallocated buffer");
            Ok(())
        }
    }

    #[inline]
    fn layout_for<E: crate::error_behavior::ErrorBehavior>(capacity: usize) -> Result<Layout, E> {
        Layout::array::<T>(capacity).map_err(|_| E::capacity_overflow())
    }

    #[inline]
    fn buffer_layout(&self) -> Layout {
        // SAFETY: this layout was valid when the buffer was allocated
        unsafe { Layout::from_size_align_unchecked(T::SIZE * self.capacity, T::ALIGN) }
    }

    /// Frees the buffer, if any, and leaves the storage without one.
    ///
    /// This does not run destructors. Calling it on a storage without a buffer does nothing.
    pub fn deallocate(&mut self) {
        if self.capacity == 0 {
            return;
        }

        if !T::IS_ZST {
            // SAFETY: `ptr` was allocated by `allocator` with this layout
            unsafe { self.allocator.deallocate(self.ptr.cast(), self.buffer_layout()) };
            trace_event!(capacity = self.capacity, "released buffer");
        }

        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }

    /// Returns the number of slots.
    #[must_use]
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the largest number of slots a buffer of `T` can have.
    ///
    /// This is `isize::MAX` for zero-sized `T` so that cursor distances never overflow.
    #[must_use]
    #[inline(always)]
    pub const fn max_capacity(&self) -> usize {
        T::MAX_SLOTS
    }

    /// Returns whether the storage holds a buffer.
    ///
    /// For zero-sized `T` this means its capacity is not zero.
    #[must_use]
    #[inline(always)]
    pub const fn is_allocated(&self) -> bool {
        self.capacity != 0
    }

    /// Returns a reference to the allocator.
    #[must_use]
    #[inline(always)]
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Returns a pointer to the first slot.
    ///
    /// The pointer is dangling if there is no buffer.
    #[must_use]
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    ///
    /// The pointer is dangling if there is no buffer.
    #[must_use]
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a cursor to the first slot.
    #[must_use]
    #[inline(always)]
    pub fn begin(&mut self) -> Cursor<T> {
        Cursor::from_ptr(self.as_mut_ptr())
    }

    /// Returns a cursor one past the last slot.
    #[must_use]
    #[inline(always)]
    pub fn end(&mut self) -> Cursor<T> {
        self.begin() + self.capacity as isize
    }

    #[inline(always)]
    fn slot(&self, pos: usize) -> NonNull<T> {
        debug_assert!(pos <= self.capacity);
        // SAFETY: `pos` is within the buffer or one past it
        unsafe { self.ptr.add(pos) }
    }

    /// Constructs `count` default values starting at slot `pos`.
    ///
    /// If `T::default` panics, the values already constructed are dropped.
    ///
    /// # Safety
    ///
    /// `pos + count` must not exceed the capacity and the slots must not hold live values.
    pub unsafe fn default_construct_n(&mut self, pos: usize, count: usize)
    where
        T: Default,
    {
        debug_assert!(pos + count <= self.capacity);

        let mut guard = unsafe { InitGuard::new(self.slot(pos)) };

        while guard.initialized() < count {
            unsafe { guard.push(T::default()) };
        }

        guard.finish();
    }

    /// Constructs `count` clones of `value` starting at slot `pos`.
    ///
    /// If `T::clone` panics, the clones already constructed are dropped.
    ///
    /// # Safety
    ///
    /// `pos + count` must not exceed the capacity and the slots must not hold live values.
    pub unsafe fn uninitialized_fill_n(&mut self, pos: usize, count: usize, value: &T)
    where
        T: Clone,
    {
        debug_assert!(pos + count <= self.capacity);

        let mut guard = unsafe { InitGuard::new(self.slot(pos)) };

        while guard.initialized() < count {
            unsafe { guard.push(value.clone()) };
        }

        guard.finish();
    }

    /// Constructs clones of the elements of `src` starting at slot `pos`.
    ///
    /// Returns the number of slots constructed.
    /// If `T::clone` panics, the clones already constructed are dropped.
    ///
    /// # Safety
    ///
    /// `pos + src.len()` must not exceed the capacity and the slots must not hold live values.
    pub unsafe fn uninitialized_copy(&mut self, pos: usize, src: &[T]) -> usize
    where
        T: Clone,
    {
        debug_assert!(pos + src.len() <= self.capacity);

        let mut guard = unsafe { InitGuard::new(self.slot(pos)) };

        for value in src {
            unsafe { guard.push(value.clone()) };
        }

        guard.finish()
    }

    /// Constructs up to `count` values taken from `iter` starting at slot `pos`.
    ///
    /// Returns the number of slots constructed, which is less than `count` if `iter` runs out early.
    /// If the iterator panics, the values already constructed are dropped.
    ///
    /// # Safety
    ///
    /// `pos + count` must not exceed the capacity and the slots must not hold live values.
    pub unsafe fn uninitialized_copy_n<I>(&mut self, pos: usize, iter: I, count: usize) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        debug_assert!(pos + count <= self.capacity);

        let mut guard = unsafe { InitGuard::new(self.slot(pos)) };

        for value in iter.into_iter().take(count) {
            unsafe { guard.push(value) };
        }

        guard.finish()
    }

    /// Drops the values in the slots of `range`.
    ///
    /// # Safety
    ///
    /// `range` must be within the capacity and its slots must hold live values.
    /// Afterwards they are uninitialized.
    pub unsafe fn destroy(&mut self, range: Range<usize>) {
        debug_assert!(range.start <= range.end && range.end <= self.capacity);

        let len = range.end - range.start;
        unsafe { ptr::drop_in_place(NonNull::slice_from_raw_parts(self.slot(range.start), len).as_ptr()) }
    }

    /// Returns whether `allocator` can't be used to free this storage's buffer.
    #[must_use]
    #[inline]
    pub fn is_allocator_not_equal(&self, allocator: &A) -> bool {
        !allocators_equal(&self.allocator, allocator)
    }

    /// Returns whether [`move_assign`](Self::move_assign) can take over `other`'s buffer.
    ///
    /// That is the case if the allocator propagates on move assignment or if both allocators are equal.
    #[must_use]
    #[inline]
    pub fn can_adopt_buffer_of(&self, other: &Self) -> bool {
        A::PROPAGATION.on_move_assign || !self.is_allocator_not_equal(&other.allocator)
    }

    #[inline]
    fn is_copy_mismatch(&self, other: &Self) -> bool {
        A::PROPAGATION.on_copy_assign && self.is_allocator_not_equal(&other.allocator)
    }

    /// Frees the buffer if copy assignment from `other` is about to replace the allocator with an unequal one.
    ///
    /// Otherwise the buffer is kept.
    #[inline]
    pub fn deallocate_on_allocator_mismatch(&mut self, other: &Self) {
        if self.is_copy_mismatch(other) {
            self.deallocate();
        }
    }

    /// Drops the values in `live` if copy assignment from `other` is about to replace the allocator
    /// with an unequal one.
    ///
    /// Returns whether the values were dropped, so the owner can reset its length.
    ///
    /// # Safety
    ///
    /// Same as [`destroy`](Self::destroy).
    #[must_use]
    #[inline]
    pub unsafe fn destroy_on_allocator_mismatch(&mut self, other: &Self, live: Range<usize>) -> bool {
        if self.is_copy_mismatch(other) {
            unsafe { self.destroy(live) };
            true
        } else {
            false
        }
    }

    /// Replaces the allocator with a copy of `other`'s if it propagates on copy assignment.
    ///
    /// A buffer the new allocator couldn't free is released first, without running destructors.
    #[inline]
    pub fn propagate_allocator_on_copy(&mut self, other: &Self) {
        if A::PROPAGATION.on_copy_assign {
            self.replace_allocator(&other.allocator);
            trace_event!("propagated allocator on copy assignment");
        }
    }

    /// Replaces the allocator with a copy of `other`'s if it propagates on move assignment.
    ///
    /// A buffer the new allocator couldn't free is released first, without running destructors.
    #[inline]
    pub fn propagate_allocator_on_move(&mut self, other: &Self) {
        if A::PROPAGATION.on_move_assign {
            self.replace_allocator(&other.allocator);
            trace_event!("propagated allocator on move assignment");
        }
    }

    #[inline]
    fn replace_allocator(&mut self, allocator: &A) {
        if self.is_allocated() && self.is_allocator_not_equal(allocator) {
            self.deallocate();
        }

        self.allocator = allocator.clone();
    }

    /// Exchanges the buffers of two storages.
    ///
    /// The allocators are exchanged too if they propagate on swap.
    ///
    /// # Errors
    ///
    /// Errors if the allocators don't propagate on swap and are not equal.
    /// Nothing is exchanged in that case.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocatorMismatchOnSwap> {
        if A::PROPAGATION.on_swap {
            mem::swap(&mut self.allocator, &mut other.allocator);
        } else if self.is_allocator_not_equal(&other.allocator) {
            trace_event!("rejected swap of storages with unequal allocators");
            return Err(AllocatorMismatchOnSwap);
        }

        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
        Ok(())
    }

    /// Exchanges the buffers of two storages.
    ///
    /// The allocators are exchanged too if they propagate on swap.
    ///
    /// # Panics
    ///
    /// Panics if the allocators don't propagate on swap and are not equal.
    #[track_caller]
    pub fn swap(&mut self, other: &mut Self) {
        if let Err(error) = self.try_swap(other) {
            panic!("{error}");
        }
    }

    /// Frees this storage's buffer and takes over `other`'s buffer.
    ///
    /// The allocator is replaced with a copy of `other`'s if it propagates on move assignment.
    /// Afterwards `other` has no buffer but keeps its allocator.
    ///
    /// # Panics
    ///
    /// Panics if the buffer can't be adopted, see [`can_adopt_buffer_of`](Self::can_adopt_buffer_of).
    #[track_caller]
    pub fn move_assign(&mut self, other: &mut Self) {
        assert!(
            self.can_adopt_buffer_of(other),
            "can't adopt a buffer from an unequal allocator that doesn't propagate on move assignment"
        );

        self.deallocate();
        self.propagate_allocator_on_move(other);

        self.ptr = mem::replace(&mut other.ptr, NonNull::dangling());
        self.capacity = mem::take(&mut other.capacity);
    }
}

impl<T, A: Allocator> Drop for ContiguousStorage<T, A> {
    #[inline]
    fn drop(&mut self) {
        self.deallocate();
    }
}

impl<T, A: Allocator + fmt::Debug> fmt::Debug for ContiguousStorage<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContiguousStorage")
            .field("capacity", &self.capacity)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}
