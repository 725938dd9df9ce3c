use core::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Range, RangeBounds},
    ptr, slice,
};

use crate::{
    AllocatorMismatchOnSwap, ContiguousStorage, Cursor, CursorFacade,
    alloc::{Allocator, Global},
    error_behavior::ErrorBehavior,
    error_behavior_generic_methods,
    overlapped_copy::overlapped_move,
    polyfill,
};

#[cfg(feature = "panic-on-alloc")]
use crate::infallible;

mod into_iter;

pub use into_iter::IntoIter;

/// A contiguous growable array type with an allocator parameter.
///
/// A `Vector` owns a [`ContiguousStorage`] and a length.
/// The first `len` slots of the storage hold live elements, the remaining slots are uninitialized.
///
/// Whenever a vector is assigned from or swapped with another one, the allocator's
/// [`Propagation`](crate::alloc::Propagation) policy decides whether the allocator travels along with the data:
/// - [`clone_from`](Clone::clone_from) and [`try_clone_from`](Self::try_clone_from) consult `on_copy_assign`,
/// - [`move_assign`](Self::move_assign) consults `on_move_assign`,
/// - [`swap`](Self::swap) consults `on_swap`.
///
/// # Examples
/// ```
/// use contiguous_vec::Vector;
///
/// let mut vec: Vector<i32> = Vector::new();
/// vec.push(1);
/// vec.push(2);
///
/// assert_eq!(vec.len(), 2);
/// assert_eq!(vec[0], 1);
///
/// assert_eq!(vec.pop(), Some(2));
/// assert_eq!(vec.len(), 1);
///
/// vec[0] = 7;
/// assert_eq!(vec[0], 7);
///
/// vec.extend([1, 2, 3]);
///
/// for x in &vec {
///     println!("{x}");
/// }
///
/// assert_eq!(vec, [7, 1, 2, 3]);
/// ```
pub struct Vector<T, A: Allocator = Global> {
    storage: ContiguousStorage<T, A>,
    len: usize,
}

impl<T> Vector<T, Global> {
    /// Constructs a new, empty `Vector<T>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    error_behavior_generic_methods! {
        /// Constructs a new, empty `Vector<T>` with exactly the specified capacity.
        impl
        for fn with_capacity
        for fn try_with_capacity
        use fn generic_with_capacity(capacity: usize) -> Self {
            Self::generic_with_capacity_in(capacity, Global)
        }

        /// Constructs a `Vector<T>` of `count` clones of `value`.
        ///
        /// ```
        /// # use contiguous_vec::Vector;
        /// let vec: Vector<char> = Vector::from_elem('a', 3);
        /// assert_eq!(vec, ['a', 'a', 'a']);
        /// ```
        impl
        for fn from_elem
        for fn try_from_elem
        use fn generic_from_elem(value: T, count: usize) -> Self
        where {
            T: Clone
        } in {
            Self::generic_from_elem_in(value, count, Global)
        }

        /// Constructs a `Vector<T>` of `count` default values.
        impl
        for fn from_default
        for fn try_from_default
        use fn generic_from_default(count: usize) -> Self
        where {
            T: Default
        } in {
            Self::generic_from_default_in(count, Global)
        }
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Constructs a new, empty `Vector<T, A>` that will allocate from `allocator`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new_in(allocator: A) -> Self {
        Self {
            storage: ContiguousStorage::new_in(allocator),
            len: 0,
        }
    }

    error_behavior_generic_methods! {
        /// Constructs a new, empty `Vector<T, A>` with exactly the specified capacity.
        ///
        /// A `capacity` of zero does not allocate.
        impl
        for fn with_capacity_in
        for fn try_with_capacity_in
        use fn generic_with_capacity_in(capacity: usize, allocator: A) -> Self {
            Ok(Self {
                storage: ContiguousStorage::generic_with_capacity_in(capacity, allocator)?,
                len: 0,
            })
        }

        /// Constructs a vector of `count` default values.
        ///
        /// If `T::default` panics, the values constructed so far are dropped.
        impl
        for fn from_default_in
        for fn try_from_default_in
        use fn generic_from_default_in(count: usize, allocator: A) -> Self
        where {
            T: Default
        } in {
            let mut vec = Self::generic_with_capacity_in::<E>(count, allocator)?;

            unsafe {
                vec.storage.default_construct_n(0, count);
                vec.set_len(count);
            }

            Ok(vec)
        }

        /// Constructs a vector of `count` clones of `value`.
        ///
        /// If `T::clone` panics, the clones constructed so far are dropped.
        impl
        for fn from_elem_in
        for fn try_from_elem_in
        use fn generic_from_elem_in(value: T, count: usize, allocator: A) -> Self
        where {
            T: Clone
        } in {
            let mut vec = Self::generic_with_capacity_in::<E>(count, allocator)?;

            unsafe {
                vec.storage.uninitialized_fill_n(0, count, &value);
                vec.set_len(count);
            }

            Ok(vec)
        }

        /// Constructs a vector of clones of the elements of `slice`.
        impl
        for fn from_slice_in
        for fn try_from_slice_in
        use fn generic_from_slice_in(slice: &[T], allocator: A) -> Self
        where {
            T: Clone
        } in {
            let mut vec = Self::generic_with_capacity_in::<E>(slice.len(), allocator)?;

            unsafe {
                let count = vec.storage.uninitialized_copy(0, slice);
                vec.set_len(count);
            }

            Ok(vec)
        }

        /// Constructs a vector of the items of `iter`.
        ///
        /// ```
        /// # use contiguous_vec::{Vector, alloc::Global};
        /// let vec = Vector::from_iter_in((1..=4).map(|i| i * i), Global);
        /// assert_eq!(vec, [1, 4, 9, 16]);
        /// ```
        impl
        for fn from_iter_in
        for fn try_from_iter_in
        use fn generic_from_iter_in<{I}>(iter: I, allocator: A) -> Self
        where {
            I: IntoIterator<Item = T>
        } in {
            let mut vec = Self::new_in(allocator);
            vec.generic_extend_iter::<E, I>(iter)?;
            Ok(vec)
        }

        /// Constructs a vector by converting each element of a foreign slice with [`From`].
        ///
        /// ```
        /// # use contiguous_vec::{Vector, alloc::Global};
        /// let bytes: &[u8] = &[1, 2, 250];
        /// let wide: Vector<u32> = Vector::from_converted_in(bytes, Global);
        /// assert_eq!(wide, [1u32, 2, 250]);
        /// ```
        impl
        for fn from_converted_in
        for fn try_from_converted_in
        use fn generic_from_converted_in<{U}>(slice: &[U], allocator: A) -> Self
        where {
            T: From<U>,
            U: Clone
        } in {
            let mut vec = Self::generic_with_capacity_in::<E>(slice.len(), allocator)?;

            unsafe {
                let count = vec.storage.uninitialized_copy_n(0, slice.iter().cloned().map(T::from), slice.len());
                vec.set_len(count);
            }

            Ok(vec)
        }
    }

    /// Clones this vector into a buffer from `allocator`.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    #[must_use]
    #[inline]
    #[cfg(feature = "panic-on-alloc")]
    pub fn clone_in<B: Allocator>(&self, allocator: B) -> Vector<T, B>
    where
        T: Clone,
    {
        infallible(Vector::generic_from_slice_in(self.as_slice(), allocator))
    }

    /// Clones this vector into a buffer from `allocator`.
    ///
    /// # Errors
    /// Errors if the allocation fails.
    #[inline]
    pub fn try_clone_in<B: Allocator>(&self, allocator: B) -> Result<Vector<T, B>, crate::AllocError>
    where
        T: Clone,
    {
        Vector::generic_from_slice_in(self.as_slice(), allocator)
    }

    /// Clones this vector, allocating from a copy of its allocator.
    ///
    /// # Errors
    /// Errors if the allocation fails.
    #[inline]
    pub fn try_clone(&self) -> Result<Self, crate::AllocError>
    where
        T: Clone,
    {
        self.try_clone_in(self.allocator().clone())
    }

    /// Copy-assigns `source` to `self`.
    ///
    /// If the allocator propagates on copy assignment and the allocators differ, the elements are dropped,
    /// the buffer is freed and the allocator is replaced before `source` is cloned in.
    /// Otherwise this works like [`assign_slice`](Self::assign_slice).
    ///
    /// # Errors
    /// Errors if the allocation fails.
    #[inline]
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), crate::AllocError>
    where
        T: Clone,
    {
        self.generic_clone_from(source)
    }

    fn generic_clone_from<E: ErrorBehavior>(&mut self, source: &Self) -> Result<(), E>
    where
        T: Clone,
    {
        if ptr::eq(&*self, source) {
            return Ok(());
        }

        let len = mem::take(&mut self.len);

        // SAFETY: the first `len` slots are live
        if !unsafe { self.storage.destroy_on_allocator_mismatch(&source.storage, 0..len) } {
            self.len = len;
        }

        self.storage.deallocate_on_allocator_mismatch(&source.storage);
        self.storage.propagate_allocator_on_copy(&source.storage);
        self.generic_assign_slice(source.as_slice())
    }

    /// Moves the elements and buffer out of `self` into a new vector.
    ///
    /// `self` is left empty without a buffer and keeps its allocator.
    ///
    /// ```
    /// # use contiguous_vec::Vector;
    /// let mut a: Vector<i32> = Vector::from_elem(1, 3);
    /// let b = a.take();
    ///
    /// assert_eq!(b, [1, 1, 1]);
    /// assert_eq!((a.len(), a.capacity()), (0, 0));
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        let fresh = ContiguousStorage::with_allocator_of(&self.storage);
        let storage = mem::replace(&mut self.storage, fresh);

        Self {
            storage,
            len: mem::take(&mut self.len),
        }
    }

    error_behavior_generic_methods! {
        /// Move-assigns `source` to `self`.
        ///
        /// The elements of `self` are dropped. If the allocator propagates on move assignment or the allocators
        /// are equal, `self` takes over `source`'s buffer. Otherwise the elements are relocated into a buffer
        /// from `self`'s allocator and `source`'s buffer is freed.
        ///
        /// Afterwards `source` is empty without a buffer and keeps its allocator.
        /// If relocating fails to allocate, `self` is left empty and `source` is unchanged.
        impl
        for fn move_assign
        for fn try_move_assign
        use fn generic_move_assign(&mut self, source: &mut Self) {
            self.clear();

            if self.storage.can_adopt_buffer_of(&source.storage) {
                self.storage.move_assign(&mut source.storage);
                self.len = mem::take(&mut source.len);
                return Ok(());
            }

            let len = source.len;

            if self.capacity() < len {
                self.storage.generic_allocate::<E>(len)?;
            }

            unsafe {
                ptr::copy_nonoverlapping(source.as_ptr(), self.as_mut_ptr(), len);
                source.set_len(0);
                self.set_len(len);
            }

            source.storage.deallocate();
            Ok(())
        }
    }

    /// Exchanges the contents of two vectors.
    ///
    /// The allocators are exchanged too if they propagate on swap.
    /// No elements are moved and no memory is allocated.
    ///
    /// # Errors
    /// Errors if the allocators don't propagate on swap and are not equal. Nothing is exchanged in that case.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocatorMismatchOnSwap> {
        self.storage.try_swap(&mut other.storage)?;
        mem::swap(&mut self.len, &mut other.len);
        Ok(())
    }

    /// Exchanges the contents of two vectors.
    ///
    /// The allocators are exchanged too if they propagate on swap.
    /// No elements are moved and no memory is allocated.
    ///
    /// # Panics
    /// Panics if the allocators don't propagate on swap and are not equal.
    #[track_caller]
    pub fn swap(&mut self, other: &mut Self) {
        if let Err(error) = self.try_swap(other) {
            panic!("{error}");
        }
    }

    error_behavior_generic_methods! {
        /// Replaces the contents with `count` clones of `value`.
        ///
        /// If `count` exceeds the capacity, the replacement is built in a new buffer from a copy of the allocator
        /// and `self` is only changed once that succeeded. Otherwise the live elements are overwritten and
        /// the rest is constructed in place or dropped.
        ///
        /// ```
        /// # use contiguous_vec::Vector;
        /// let mut vec: Vector<i32> = Vector::from_elem(0, 4);
        ///
        /// vec.assign_fill(2, 9);
        /// assert_eq!(vec, [9, 9]);
        ///
        /// vec.assign_fill(3, 5);
        /// assert_eq!(vec, [5, 5, 5]);
        /// ```
        impl
        for fn assign_fill
        for fn try_assign_fill
        use fn generic_assign_fill(&mut self, count: usize, value: T)
        where {
            T: Clone
        } in {
            if count > self.capacity() {
                let mut replacement = Self::generic_from_elem_in::<E>(value, count, self.allocator().clone())?;
                mem::swap(self, &mut replacement);
            } else if count > self.len {
                for element in self.as_mut_slice() {
                    element.clone_from(&value);
                }

                unsafe {
                    self.storage.uninitialized_fill_n(self.len, count - self.len, &value);
                    self.set_len(count);
                }
            } else {
                for element in &mut self.as_mut_slice()[..count] {
                    element.clone_from(&value);
                }

                self.erase(count..);
            }

            Ok(())
        }

        /// Replaces the contents with clones of the elements of `slice`.
        ///
        /// Like [`assign_fill`](Self::assign_fill), a slice longer than the capacity is cloned into a new buffer first
        /// and the live elements are reused otherwise.
        impl
        for fn assign_slice
        for fn try_assign_slice
        use fn generic_assign_slice(&mut self, slice: &[T])
        where {
            T: Clone
        } in {
            let len = self.len;

            if slice.len() > self.capacity() {
                let mut replacement = Self::generic_from_slice_in::<E>(slice, self.allocator().clone())?;
                mem::swap(self, &mut replacement);
            } else if slice.len() > len {
                let (head, tail) = slice.split_at(len);
                self.as_mut_slice().clone_from_slice(head);

                unsafe {
                    let count = self.storage.uninitialized_copy(len, tail);
                    self.set_len(len + count);
                }
            } else {
                self.as_mut_slice()[..slice.len()].clone_from_slice(slice);
                self.erase(slice.len()..);
            }

            Ok(())
        }

        /// Replaces the contents with the items of `iter`, reusing the buffer.
        impl
        for fn assign_iter
        for fn try_assign_iter
        use fn generic_assign_iter<{I}>(&mut self, iter: I)
        where {
            I: IntoIterator<Item = T>
        } in {
            self.clear();
            self.generic_extend_iter(iter)
        }

        /// Replaces the contents with the elements of a foreign slice, converting each with [`From`].
        ///
        /// The buffer is reused the same way as in [`assign_slice`](Self::assign_slice).
        ///
        /// ```
        /// # use contiguous_vec::Vector;
        /// let mut vec: Vector<i64> = Vector::from([9, 9, 9]);
        /// vec.assign_converted(&[1i32, -2]);
        /// assert_eq!(vec, [1i64, -2]);
        /// ```
        impl
        for fn assign_converted
        for fn try_assign_converted
        use fn generic_assign_converted<{U}>(&mut self, slice: &[U])
        where {
            T: From<U>,
            U: Clone
        } in {
            let len = self.len;

            if slice.len() > self.capacity() {
                let mut replacement = Self::generic_from_converted_in::<E, U>(slice, self.allocator().clone())?;
                mem::swap(self, &mut replacement);
            } else if slice.len() > len {
                let (head, tail) = slice.split_at(len);

                for (element, source) in self.as_mut_slice().iter_mut().zip(head) {
                    *element = T::from(source.clone());
                }

                unsafe {
                    let count = self.storage.uninitialized_copy_n(len, tail.iter().cloned().map(T::from), tail.len());
                    self.set_len(len + count);
                }
            } else {
                for (element, source) in self.as_mut_slice().iter_mut().zip(slice) {
                    *element = T::from(source.clone());
                }

                self.erase(slice.len()..);
            }

            Ok(())
        }
    }

    /// Returns the number of elements in the vector.
    #[must_use]
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector contains no elements.
    #[must_use]
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[must_use]
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the largest number of elements a vector of `T` can ever hold.
    #[must_use]
    #[inline(always)]
    pub const fn max_capacity(&self) -> usize {
        self.storage.max_capacity()
    }

    /// Returns a reference to the allocator.
    #[must_use]
    #[inline(always)]
    pub const fn allocator(&self) -> &A {
        self.storage.allocator()
    }

    /// Returns a reference to the underlying storage.
    #[must_use]
    #[inline(always)]
    pub const fn storage(&self) -> &ContiguousStorage<T, A> {
        &self.storage
    }

    /// Returns a raw pointer to the vector's buffer, or a dangling pointer if it has none.
    #[must_use]
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns a raw mutable pointer to the vector's buffer, or a dangling pointer if it has none.
    #[must_use]
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Extracts a slice containing the entire vector.
    #[must_use]
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice containing the entire vector.
    #[must_use]
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are live
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns cursors to the first element and one past the last element.
    #[must_use]
    #[inline]
    pub fn cursor_range(&mut self) -> Range<Cursor<T>> {
        let begin = self.storage.begin();
        begin..begin + self.len as isize
    }

    /// Forces the length of the vector to `new_len`.
    ///
    /// # Safety
    /// - `new_len` must be less than or equal to the capacity.
    /// - The elements at `old_len..new_len` must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    error_behavior_generic_methods! {
        /// Appends an element to the back of the vector.
        impl
        for fn push
        for fn try_push
        use fn generic_push(&mut self, value: T) {
            if self.len == self.capacity() {
                self.generic_reserve::<E>(1)?;
            }

            unsafe {
                self.as_mut_ptr().add(self.len).write(value);
                self.set_len(self.len + 1);
            }

            Ok(())
        }

        /// Inserts an element at position `index`, shifting all elements after it to the right.
        ///
        /// # Panics
        /// Panics if `index > len`.
        impl
        for fn insert
        for fn try_insert
        use fn generic_insert(&mut self, index: usize, value: T) {
            #[cold]
            #[inline(never)]
            #[track_caller]
            fn assert_failed(index: usize, len: usize) -> ! {
                panic!("insertion index (is {index}) should be <= len (is {len})");
            }

            let len = self.len;

            if index > len {
                assert_failed(index, len);
            }

            if len == self.capacity() {
                self.generic_reserve::<E>(1)?;
            }

            unsafe {
                let begin = self.storage.begin();
                overlapped_move(begin + index as isize, begin + len as isize, begin + index as isize + 1);
                self.as_mut_ptr().add(index).write(value);
                self.set_len(len + 1);
            }

            Ok(())
        }

        /// Clones and appends all elements in `slice` to the vector.
        ///
        /// If `T::clone` panics, the clones appended so far are dropped.
        impl
        for fn extend_from_slice
        for fn try_extend_from_slice
        use fn generic_extend_from_slice(&mut self, slice: &[T])
        where {
            T: Clone
        } in {
            self.generic_reserve::<E>(slice.len())?;

            unsafe {
                let count = self.storage.uninitialized_copy(self.len, slice);
                self.set_len(self.len + count);
            }

            Ok(())
        }

        /// Reserves capacity for at least `additional` more elements.
        ///
        /// The capacity grows to the larger of twice the current capacity and the required capacity.
        /// Does nothing if the capacity is already sufficient.
        impl
        for fn reserve
        for fn try_reserve
        use fn generic_reserve(&mut self, additional: usize) {
            let required = match self.len.checked_add(additional) {
                Some(required) => required,
                None => return Err(E::capacity_overflow()),
            };

            let capacity = self.capacity();

            if required <= capacity {
                return Ok(());
            }

            let doubled = capacity.saturating_mul(2).min(self.storage.max_capacity());
            self.storage.generic_reallocate(doubled.max(required))
        }

        /// Reserves capacity for exactly `additional` more elements.
        ///
        /// Does nothing if the capacity is already sufficient.
        impl
        for fn reserve_exact
        for fn try_reserve_exact
        use fn generic_reserve_exact(&mut self, additional: usize) {
            let required = match self.len.checked_add(additional) {
                Some(required) => required,
                None => return Err(E::capacity_overflow()),
            };

            if required <= self.capacity() {
                return Ok(());
            }

            self.storage.generic_reallocate(required)
        }

        /// Shrinks the capacity to the length, freeing the buffer if the vector is empty.
        impl
        for fn shrink_to_fit
        for fn try_shrink_to_fit
        use fn generic_shrink_to_fit(&mut self,) {
            self.storage.generic_reallocate(self.len)
        }

        /// Resizes the vector so that `len` is equal to `new_len`.
        ///
        /// Growing appends clones of `value`, shrinking drops the excess elements.
        impl
        for fn resize
        for fn try_resize
        use fn generic_resize(&mut self, new_len: usize, value: T)
        where {
            T: Clone
        } in {
            let len = self.len;

            if new_len <= len {
                self.truncate(new_len);
                return Ok(());
            }

            self.generic_reserve::<E>(new_len - len)?;

            unsafe {
                self.storage.uninitialized_fill_n(len, new_len - len, &value);
                self.set_len(new_len);
            }

            Ok(())
        }

        /// Resizes the vector so that `len` is equal to `new_len`.
        ///
        /// Growing appends values returned by `f`, shrinking drops the excess elements.
        impl
        for fn resize_with
        for fn try_resize_with
        use fn generic_resize_with<{F}>(&mut self, new_len: usize, f: F)
        where {
            F: FnMut() -> T
        } in {
            let len = self.len;

            if new_len <= len {
                self.truncate(new_len);
                return Ok(());
            }

            self.generic_reserve::<E>(new_len - len)?;

            unsafe {
                let count = self.storage.uninitialized_copy_n(len, iter::repeat_with(f), new_len - len);
                self.set_len(len + count);
            }

            Ok(())
        }

        /// Resizes the vector so that `len` is equal to `new_len`.
        ///
        /// Growing appends default values, shrinking drops the excess elements.
        impl
        for fn resize_default
        for fn try_resize_default
        use fn generic_resize_default(&mut self, new_len: usize)
        where {
            T: Default
        } in {
            let len = self.len;

            if new_len <= len {
                self.truncate(new_len);
                return Ok(());
            }

            self.generic_reserve::<E>(new_len - len)?;

            unsafe {
                self.storage.default_construct_n(len, new_len - len);
                self.set_len(new_len);
            }

            Ok(())
        }
    }

    fn generic_extend_iter<E: ErrorBehavior, I>(&mut self, iter: I) -> Result<(), E>
    where
        I: IntoIterator<Item = T>,
    {
        let mut iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.generic_reserve::<E>(lower)?;

        // fill the reserved slots without checking capacity per element
        unsafe {
            let count = self.storage.uninitialized_copy_n(self.len, iter.by_ref(), self.capacity() - self.len);
            self.set_len(self.len + count);
        }

        for value in iter {
            self.generic_push::<E>(value)?;
        }

        Ok(())
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        unsafe {
            self.set_len(self.len - 1);
            Some(self.as_ptr().add(self.len).read())
        }
    }

    /// Removes and returns the element at position `index`, shifting all elements after it to the left.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;

        if index >= len {
            assert_failed(index, len);
        }

        unsafe {
            let value = self.as_ptr().add(index).read();
            let begin = self.storage.begin();
            overlapped_move(begin + index as isize + 1, begin + len as isize, begin + index as isize);
            self.set_len(len - 1);
            value
        }
    }

    /// Shortens the vector, keeping the first `len` elements and dropping the rest.
    ///
    /// Does nothing if `len` is greater than or equal to the vector's current length.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len;

        if len >= old_len {
            return;
        }

        // a panicking destructor leaks the remaining tail instead of dropping it twice
        self.len = len;
        unsafe { self.storage.destroy(len..old_len) };
    }

    /// Drops all elements. The capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drops the elements in `range` and shifts the elements after it to the left.
    ///
    /// Returns the index of the element that followed the erased range, which is `range.start`.
    /// The relative order of the remaining elements is kept.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or its start is greater than its end.
    ///
    /// # Examples
    /// ```
    /// # use contiguous_vec::Vector;
    /// let mut vec: Vector<i32> = Vector::from_iter_in([10, 11, 12, 13, 14], Default::default());
    /// assert_eq!(vec.erase(1..3), 1);
    /// assert_eq!(vec, [10, 13, 14]);
    /// ```
    #[track_caller]
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) -> usize {
        let Range { start, end } = polyfill::range(range, ..self.len);

        if start == end {
            return start;
        }

        let guard = ShiftTailOnDrop {
            old_len: self.len,
            start,
            end,
            vec: self,
        };

        guard.vec.len = start;

        // SAFETY: the range is within the live elements
        unsafe { guard.vec.storage.destroy(start..end) };

        drop(guard);
        start
    }

    /// Drops the element at `index` and shifts the elements after it to the left.
    ///
    /// Returns `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn erase_at(&mut self, index: usize) -> usize {
        self.erase(index..=index)
    }

    /// Drops the elements between two cursors and shifts the elements after them to the left.
    ///
    /// Returns a cursor to the element that followed the erased range.
    ///
    /// # Panics
    /// Panics if the cursors are not within [`cursor_range`](Self::cursor_range) or are out of order.
    #[track_caller]
    pub fn erase_cursor_range(&mut self, range: Range<Cursor<T>>) -> Cursor<T> {
        let begin = self.storage.begin();
        let first = range.start.difference(&begin);
        let last = range.end.difference(&begin);

        assert!(
            0 <= first && first <= last && last <= self.len as isize,
            "cursor range is not within the vector"
        );

        let index = self.erase(first as usize..last as usize);
        self.storage.begin() + index as isize
    }
}

/// Closes the gap left by an erase, even if a destructor panicked.
struct ShiftTailOnDrop<'a, T, A: Allocator> {
    vec: &'a mut Vector<T, A>,
    start: usize,
    end: usize,
    old_len: usize,
}

impl<T, A: Allocator> Drop for ShiftTailOnDrop<'_, T, A> {
    fn drop(&mut self) {
        let Self { start, end, old_len, .. } = *self;

        unsafe {
            let begin = self.vec.storage.begin();
            overlapped_move(begin + end as isize, begin + old_len as isize, begin + start as isize);
            self.vec.set_len(old_len - (end - start));
        }
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: the first `len` slots are live; the storage frees the buffer afterwards
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator + Default> Default for Vector<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<T: Clone, A: Allocator> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        self.clone_in(self.allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        infallible(self.generic_clone_from(source));
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, U, A: Allocator, B: Allocator> PartialEq<Vector<U, B>> for Vector<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vector<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T, U, A: Allocator> PartialEq<[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator> PartialEq<&[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<&[U; N]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; N]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator> PartialEq<Vector<U, A>> for [T]
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vector<U, A>) -> bool {
        self == other.as_slice()
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        infallible(self.generic_extend_iter(iter));
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        infallible(self.generic_extend_iter(iter.into_iter().copied()));
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<T, A: Allocator + Default> FromIterator<T> for Vector<T, A> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, A::default())
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<T, A: Allocator + Default, const N: usize> From<[T; N]> for Vector<T, A> {
    #[inline]
    fn from(array: [T; N]) -> Self {
        Self::from_iter_in(array, A::default())
    }
}

#[cfg(feature = "panic-on-alloc")]
impl<T: Clone, A: Allocator + Default> From<&[T]> for Vector<T, A> {
    #[inline]
    fn from(slice: &[T]) -> Self {
        Self::from_slice_in(slice, A::default())
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);

        // SAFETY: `this` is never used or dropped again
        let storage = unsafe { ptr::read(&this.storage) };

        unsafe { IntoIter::new(storage, this.len) }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
