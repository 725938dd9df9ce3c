use core::{ops::Range, ptr};

use crate::{Cursor, CursorFacade, SizedTypeProperties};

/// The order in which elements are visited by a range copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDirection {
    /// From the first element to the last.
    Forward,
    /// From the last element to the first.
    Backward,
}

impl CopyDirection {
    /// Picks the direction for copying `[first, last)` to a destination starting at `result`.
    ///
    /// Copying forward would overwrite source elements before they are read if the destination
    /// starts inside the source range, so that case copies backward.
    ///
    /// ```
    /// use contiguous_vec::overlapped_copy::CopyDirection;
    ///
    /// assert_eq!(CopyDirection::between(&0, &5, &3), CopyDirection::Backward);
    /// assert_eq!(CopyDirection::between(&3, &8, &0), CopyDirection::Forward);
    /// assert_eq!(CopyDirection::between(&0, &0, &0), CopyDirection::Forward);
    /// ```
    #[inline]
    pub fn between<P: PartialOrd>(first: &P, last: &P, result: &P) -> Self {
        if first < last && first <= result && result < last {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// Clone-assigns the elements of `src` onto the elements starting at `dest`, all within `slice`.
///
/// The ranges may overlap. The result is the same as if `src` had been cloned into a temporary first.
/// Returns the end of the destination range.
///
/// # Panics
///
/// Panics if `src` or the destination range is out of bounds.
/// An empty `src` copies nothing, so its destination is not checked.
///
/// # Example
/// ```
/// use contiguous_vec::overlapped_copy::overlapped_copy;
///
/// let mut array = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// let end = overlapped_copy(&mut array, 0..5, 3);
///
/// assert_eq!(end, 8);
/// assert_eq!(array, [1, 2, 3, 1, 2, 3, 4, 5, 9, 10]);
/// ```
#[track_caller]
pub fn overlapped_copy<T: Clone>(slice: &mut [T], src: Range<usize>, dest: usize) -> usize {
    let Range { start, end } = crate::polyfill::range(src, ..slice.len());
    let count = end - start;

    if count == 0 {
        return dest;
    }

    let dest_end = match dest.checked_add(count) {
        Some(dest_end) if dest_end <= slice.len() => dest_end,
        _ => panic!("destination is out of bounds"),
    };

    match CopyDirection::between(&start, &end, &dest) {
        CopyDirection::Forward => {
            for i in 0..count {
                clone_within(slice, start + i, dest + i);
            }
        }
        CopyDirection::Backward => {
            for i in (0..count).rev() {
                clone_within(slice, start + i, dest + i);
            }
        }
    }

    dest_end
}

#[inline]
fn clone_within<T: Clone>(slice: &mut [T], from: usize, to: usize) {
    use core::cmp::Ordering;

    match from.cmp(&to) {
        Ordering::Equal => (),
        Ordering::Less => {
            let (head, tail) = slice.split_at_mut(to);
            tail[0].clone_from(&head[from]);
        }
        Ordering::Greater => {
            let (head, tail) = slice.split_at_mut(from);
            head[to].clone_from(&tail[0]);
        }
    }
}

/// Bitwise moves the elements of `[first, last)` to the slots starting at `result`.
///
/// The ranges may overlap. Returns the end of the destination range.
///
/// This is a relocation: afterwards the destination holds the elements
/// and the source slots that are not part of the destination must be treated as uninitialized.
///
/// # Safety
///
/// - `first` and `last` must be cursors into the same buffer with `first <= last`.
/// - `[first, last)` must be valid for reads and the destination range must be valid for writes.
pub unsafe fn overlapped_move<T>(first: Cursor<T>, last: Cursor<T>, result: Cursor<T>) -> Cursor<T> {
    let count = last.difference(&first);
    debug_assert!(count >= 0);

    if T::IS_ZST {
        return result + count;
    }

    match CopyDirection::between(&first, &last, &result) {
        CopyDirection::Forward => {
            let mut src = first;
            let mut dst = result;

            while src != last {
                unsafe { ptr::copy(src.post_increment().as_ptr(), dst.post_increment().as_ptr(), 1) };
            }

            dst
        }
        CopyDirection::Backward => {
            let mut src = last;
            let mut dst = result + count;
            let dest_end = dst;

            while src != first {
                unsafe { ptr::copy(src.decrement().as_ptr(), dst.decrement().as_ptr(), 1) };
            }

            dest_end
        }
    }
}
