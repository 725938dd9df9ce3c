use core::{cmp::Ordering, fmt, ptr::NonNull};

use crate::SizedTypeProperties;

/// A random-access position built from four primitives.
///
/// Implementors supply [`advance`](Self::advance), [`distance_to`](Self::distance_to),
/// [`equal_to`](Self::equal_to) and [`dereference`](Self::dereference).
/// Stepping, offsetting, differences and ordering are provided on top of those,
/// and [`impl_cursor_ops!`](crate::impl_cursor_ops) turns them into operators.
///
/// # Example
/// ```
/// use contiguous_vec::{CursorFacade, Vector};
///
/// let mut vec: Vector<i32> = Vector::from_slice_in(&[1, 2, 3, 4], Default::default());
/// let range = vec.cursor_range();
/// let (begin, end) = (range.start, range.end);
///
/// assert_eq!(end.difference(&begin), 4);
/// assert_eq!(unsafe { *begin.at(2) }, 3);
/// assert!(begin < end);
/// assert_eq!(begin + 4, end);
/// ```
pub trait CursorFacade: Clone {
    /// The element type this cursor points to.
    type Target;

    /// Moves the cursor by `n` elements, backwards if `n` is negative.
    fn advance(&mut self, n: isize);

    /// Returns how many elements `other` is ahead of `self`.
    fn distance_to(&self, other: &Self) -> isize;

    /// Returns whether both cursors address the same position.
    fn equal_to(&self, other: &Self) -> bool;

    /// Returns a reference to the element at the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must point to a live element that outlives `'a` and isn't mutated during `'a`.
    unsafe fn dereference<'a>(&self) -> &'a Self::Target;

    /// Moves the cursor one element forward and returns it.
    #[inline]
    fn increment(&mut self) -> &mut Self {
        self.advance(1);
        self
    }

    /// Moves the cursor one element backward and returns it.
    #[inline]
    fn decrement(&mut self) -> &mut Self {
        self.advance(-1);
        self
    }

    /// Moves the cursor one element forward and returns its previous position.
    #[inline]
    #[must_use = "use `increment` if you don't need the previous position"]
    fn post_increment(&mut self) -> Self {
        let previous = self.clone();
        self.advance(1);
        previous
    }

    /// Moves the cursor one element backward and returns its previous position.
    #[inline]
    #[must_use = "use `decrement` if you don't need the previous position"]
    fn post_decrement(&mut self) -> Self {
        let previous = self.clone();
        self.advance(-1);
        previous
    }

    /// Returns a cursor `n` elements ahead.
    #[inline]
    #[must_use]
    fn offset(&self, n: isize) -> Self {
        let mut cursor = self.clone();
        cursor.advance(n);
        cursor
    }

    /// Returns a cursor `n` elements behind.
    #[inline]
    #[must_use]
    fn offset_back(&self, n: isize) -> Self {
        let mut cursor = self.clone();
        cursor.advance(n.wrapping_neg());
        cursor
    }

    /// Returns how many elements `self` is ahead of `origin`.
    ///
    /// This is what `self - origin` evaluates to.
    #[inline]
    fn difference(&self, origin: &Self) -> isize {
        origin.distance_to(self)
    }

    /// Returns a reference to the element `n` positions away.
    ///
    /// # Safety
    ///
    /// Same as [`dereference`](Self::dereference) for the cursor `self.offset(n)`.
    #[inline]
    unsafe fn at<'a>(&self, n: isize) -> &'a Self::Target {
        unsafe { self.offset(n).dereference() }
    }

    /// Orders two cursors by position.
    #[inline]
    fn compare(&self, other: &Self) -> Ordering {
        if self.equal_to(other) {
            Ordering::Equal
        } else {
            0.cmp(&self.distance_to(other))
        }
    }
}

/// Implements comparison and arithmetic operators for a [`CursorFacade`].
///
/// The generated impls are `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Add<isize>`, `AddAssign<isize>`,
/// `Sub<isize>`, `SubAssign<isize>` and `Sub<Self, Output = isize>`.
///
/// ```
/// use contiguous_vec::{CursorFacade, impl_cursor_ops};
///
/// #[derive(Clone, Debug)]
/// struct Counter(isize);
///
/// impl CursorFacade for Counter {
///     type Target = ();
///
///     fn advance(&mut self, n: isize) {
///         self.0 += n;
///     }
///
///     fn distance_to(&self, other: &Self) -> isize {
///         other.0 - self.0
///     }
///
///     fn equal_to(&self, other: &Self) -> bool {
///         self.0 == other.0
///     }
///
///     unsafe fn dereference<'a>(&self) -> &'a () {
///         &()
///     }
/// }
///
/// impl_cursor_ops!(impl<> for Counter);
///
/// let a = Counter(3);
/// let b = a.clone() + 4;
/// assert!(a < b);
/// assert_eq!(b - a, 4);
/// ```
#[macro_export]
macro_rules! impl_cursor_ops {
    (impl<$($generic:ident),*> for $ty:ty) => {
        impl<$($generic),*> ::core::cmp::PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                $crate::CursorFacade::equal_to(self, other)
            }
        }

        impl<$($generic),*> ::core::cmp::Eq for $ty {}

        impl<$($generic),*> ::core::cmp::PartialOrd for $ty {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some($crate::CursorFacade::compare(self, other))
            }
        }

        impl<$($generic),*> ::core::cmp::Ord for $ty {
            #[inline]
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                $crate::CursorFacade::compare(self, other)
            }
        }

        impl<$($generic),*> ::core::ops::Add<isize> for $ty {
            type Output = Self;

            #[inline]
            fn add(self, n: isize) -> Self {
                $crate::CursorFacade::offset(&self, n)
            }
        }

        impl<$($generic),*> ::core::ops::AddAssign<isize> for $ty {
            #[inline]
            fn add_assign(&mut self, n: isize) {
                $crate::CursorFacade::advance(self, n);
            }
        }

        impl<$($generic),*> ::core::ops::Sub<isize> for $ty {
            type Output = Self;

            #[inline]
            fn sub(self, n: isize) -> Self {
                $crate::CursorFacade::offset_back(&self, n)
            }
        }

        impl<$($generic),*> ::core::ops::SubAssign<isize> for $ty {
            #[inline]
            fn sub_assign(&mut self, n: isize) {
                $crate::CursorFacade::advance(self, n.wrapping_neg());
            }
        }

        impl<$($generic),*> ::core::ops::Sub for $ty {
            type Output = isize;

            #[inline]
            fn sub(self, origin: Self) -> isize {
                $crate::CursorFacade::difference(&self, &origin)
            }
        }
    };
}

/// A raw position inside a contiguous buffer.
///
/// It does not borrow the buffer, so it stays `Copy` and any number of cursors may point to the same slot.
/// A cursor is invalidated when its buffer is reallocated or freed, which is not tracked.
/// Moving a cursor never dereferences it, so it may point anywhere; only
/// [`dereference`](CursorFacade::dereference) and [`get_mut`](Self::get_mut) require a live element.
///
/// For zero-sized `T` a cursor advances one byte per element, so differences still count elements.
pub struct Cursor<T> {
    ptr: *mut T,
}

impl<T> Clone for Cursor<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.ptr).finish()
    }
}

impl<T> Cursor<T> {
    /// Creates a cursor at `ptr`.
    #[inline(always)]
    #[must_use]
    pub const fn from_ptr(ptr: *mut T) -> Self {
        Self { ptr }
    }

    /// Returns the raw pointer for this position.
    ///
    /// For zero-sized `T` this encodes the position in its address and must not be used for anything but comparisons.
    #[inline(always)]
    #[must_use]
    pub const fn as_ptr(self) -> *mut T {
        self.ptr
    }

    /// Returns a mutable reference to the element at the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must point to a live element that outlives `'a` and no other reference to it may exist during `'a`.
    #[inline(always)]
    #[must_use]
    pub unsafe fn get_mut<'a>(self) -> &'a mut T {
        if T::IS_ZST {
            unsafe { &mut *NonNull::dangling().as_ptr() }
        } else {
            unsafe { &mut *self.ptr }
        }
    }
}

impl<T> CursorFacade for Cursor<T> {
    type Target = T;

    #[inline(always)]
    fn advance(&mut self, n: isize) {
        self.ptr = if T::IS_ZST {
            self.ptr.wrapping_byte_offset(n)
        } else {
            self.ptr.wrapping_offset(n)
        };
    }

    #[inline(always)]
    fn distance_to(&self, other: &Self) -> isize {
        let bytes = other.ptr.addr().wrapping_sub(self.ptr.addr()) as isize;

        if T::IS_ZST { bytes } else { bytes / T::SIZE as isize }
    }

    #[inline(always)]
    fn equal_to(&self, other: &Self) -> bool {
        self.ptr.addr() == other.ptr.addr()
    }

    #[inline(always)]
    unsafe fn dereference<'a>(&self) -> &'a T {
        if T::IS_ZST {
            unsafe { &*NonNull::dangling().as_ptr() }
        } else {
            unsafe { &*self.ptr }
        }
    }
}

impl_cursor_ops!(impl<T> for Cursor<T>);
