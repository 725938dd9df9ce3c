use core::cmp::Ordering;

use crate::{Cursor, CursorFacade, Vector, alloc::Global, impl_cursor_ops};

fn five() -> Vector<i32> {
    Vector::from_iter_in([10, 20, 30, 40, 50], Global)
}

#[test]
fn forward_traversal() {
    let mut vec = five();
    let range = vec.cursor_range();
    let mut cursor = range.start;
    let mut seen = std::vec::Vec::new();

    while cursor != range.end {
        seen.push(unsafe { *cursor.post_increment().dereference() });
    }

    assert_eq!(seen, [10, 20, 30, 40, 50]);
}

#[test]
fn backward_traversal() {
    let mut vec = five();
    let range = vec.cursor_range();
    let mut cursor = range.end;
    let mut seen = std::vec::Vec::new();

    while cursor != range.start {
        seen.push(unsafe { *cursor.decrement().dereference() });
    }

    assert_eq!(seen, [50, 40, 30, 20, 10]);
}

#[test]
fn arithmetic() {
    let mut vec = five();
    let range = vec.cursor_range();
    let (begin, end) = (range.start, range.end);

    assert_eq!(end - begin, 5);
    assert_eq!(begin - end, -5);
    assert_eq!(begin.distance_to(&end), 5);
    assert_eq!(end.difference(&begin), 5);

    let mut cursor = begin;
    cursor += 3;
    assert_eq!(unsafe { *cursor.dereference() }, 40);
    cursor -= 2;
    assert_eq!(unsafe { *cursor.dereference() }, 20);

    assert_eq!(begin + 5, end);
    assert_eq!(end - 5, begin);
    assert_eq!(begin.offset(2), end.offset_back(3));
    assert_eq!(unsafe { *end.at(-1) }, 50);

    let mut cursor = begin;
    let previous = cursor.post_increment();
    assert_eq!(previous, begin);
    assert_eq!(cursor, begin + 1);

    let previous = cursor.post_decrement();
    assert_eq!(previous, begin + 1);
    assert_eq!(cursor, begin);

    cursor.increment().increment();
    assert_eq!(cursor - begin, 2);
}

#[test]
fn ordering() {
    let mut vec = five();
    let range = vec.cursor_range();
    let (begin, end) = (range.start, range.end);

    assert!(begin < end);
    assert!(end > begin);
    assert!(begin <= begin);
    assert!(begin >= begin);
    assert_eq!(begin.compare(&end), Ordering::Less);
    assert_eq!(end.compare(&begin), Ordering::Greater);
    assert_eq!((begin + 2).cmp(&(end - 3)), Ordering::Equal);
    assert_eq!(begin.max(end), end);
}

#[test]
fn get_mut() {
    let mut vec = five();
    let begin = vec.cursor_range().start;

    unsafe { *(begin + 1).get_mut() += 1 };

    assert_eq!(vec, [10, 21, 30, 40, 50]);
}

#[test]
fn zero_sized_cursor_counts_elements() {
    let mut vec: Vector<()> = Vector::from_elem((), 4);
    let range = vec.cursor_range();

    assert_eq!(range.end - range.start, 4);
    assert!(range.start < range.end);
    assert_eq!(unsafe { *range.start.dereference() }, ());
}

/// A cursor over an index space that doesn't point into memory.
#[derive(Clone, Debug)]
struct Index {
    position: isize,
    stride: isize,
}

impl CursorFacade for Index {
    type Target = isize;

    fn advance(&mut self, n: isize) {
        self.position += n * self.stride;
    }

    fn distance_to(&self, other: &Self) -> isize {
        (other.position - self.position) / self.stride
    }

    fn equal_to(&self, other: &Self) -> bool {
        self.position == other.position
    }

    unsafe fn dereference<'a>(&self) -> &'a isize {
        &0
    }
}

impl_cursor_ops!(impl<> for Index);

#[test]
fn custom_cursor_gets_operators() {
    let a = Index { position: 0, stride: 3 };
    let b = a.clone() + 4;

    assert_eq!(b.position, 12);
    assert_eq!(b.clone() - a.clone(), 4);
    assert!(a < b);
    assert_eq!((b.clone() - 4), a);
    assert_eq!(a.compare(&a.clone()), Ordering::Equal);
}

#[test]
fn raw_cursor_debug() {
    let cursor = Cursor::from_ptr(core::ptr::null_mut::<u8>());
    assert_eq!(format!("{cursor:?}"), "Cursor(0x0)");
}
