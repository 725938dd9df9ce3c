//! Helpers the standard library keeps unstable.

use core::ops::{Bound, Range, RangeBounds, RangeTo};

/// Resolves `range` against `..len`, panicking like slice indexing does when it is out of bounds.
///
/// Stand-in for the unstable `core::slice::range`.
#[track_caller]
pub(crate) fn range<R>(range: R, bounds: RangeTo<usize>) -> Range<usize>
where
    R: RangeBounds<usize>,
{
    let len = bounds.end;

    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).unwrap_or_else(|| start_overflow()),
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).unwrap_or_else(|| end_overflow()),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };

    if start > end {
        order_fail(start, end);
    }

    if end > len {
        end_len_fail(end, len);
    }

    start..end
}

#[cold]
#[inline(never)]
#[track_caller]
fn start_overflow() -> ! {
    panic!("attempted to index slice from after maximum usize");
}

#[cold]
#[inline(never)]
#[track_caller]
fn end_overflow() -> ! {
    panic!("attempted to index slice up to maximum usize");
}

#[cold]
#[inline(never)]
#[track_caller]
fn order_fail(start: usize, end: usize) -> ! {
    panic!("slice index starts at {start} but ends at {end}");
}

#[cold]
#[inline(never)]
#[track_caller]
fn end_len_fail(end: usize, len: usize) -> ! {
    panic!("range end index {end} out of range for slice of length {len}");
}
