use crate::{ContiguousStorage, Vector, alloc::Global};

use super::Pinned;

/// A zero-sized type that counts its drops through a thread local.
#[derive(Clone, Default, Debug, PartialEq)]
struct Unit;

std::thread_local! {
    static UNIT_DROPS: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

impl Drop for Unit {
    fn drop(&mut self) {
        UNIT_DROPS.set(UNIT_DROPS.get() + 1);
    }
}

#[test]
fn never_allocates() {
    let allocator = Pinned::new(0);
    let mut vec: Vector<(), _> = Vector::new_in(allocator.clone());

    for _ in 0..100 {
        vec.push(());
    }

    vec.reserve_exact(1000);
    vec.insert(50, ());
    vec.erase(10..20);

    assert_eq!(vec.len(), 91);
    assert!(vec.capacity() >= 1091);
    assert_eq!(allocator.live_allocations(), 0);
}

#[test]
fn storage_capacity_is_counted() {
    let mut storage: ContiguousStorage<()> = ContiguousStorage::with_capacity(5);
    assert_eq!(storage.capacity(), 5);
    assert!(storage.is_allocated());
    assert_eq!(storage.max_capacity(), isize::MAX as usize);

    storage.reallocate(2);
    assert_eq!(storage.capacity(), 2);

    storage.deallocate();
    assert!(!storage.is_allocated());
}

#[test]
fn drops_are_counted() {
    UNIT_DROPS.set(0);

    let mut vec: Vector<Unit> = Vector::from_elem(Unit, 6);
    assert_eq!(UNIT_DROPS.get(), 1);

    vec.erase(1..3);
    assert_eq!(UNIT_DROPS.get(), 3);
    assert_eq!(vec.len(), 4);

    assert_eq!(vec.pop(), Some(Unit));
    assert_eq!(UNIT_DROPS.get(), 5);

    // over capacity, so the fill value and the three old elements go away
    vec.assign_fill(10, Unit);
    assert_eq!(vec.len(), 10);
    assert_eq!(UNIT_DROPS.get(), 9);

    drop(vec);
    assert_eq!(UNIT_DROPS.get(), 19);
}

#[test]
fn into_iter_yields_every_element() {
    let vec: Vector<()> = Vector::from_elem((), 7);
    assert_eq!(vec.into_iter().count(), 7);

    let vec: Vector<()> = Vector::from_elem((), 3);
    let mut iter = vec.into_iter();
    assert_eq!(iter.next_back(), Some(()));
    assert_eq!(iter.len(), 2);
}

#[test]
fn swap_and_move() {
    let allocator = Pinned::new(1);
    let mut a: Vector<(), _> = Vector::from_elem_in((), 3, allocator.clone());
    let mut b: Vector<(), _> = Vector::from_elem_in((), 5, allocator);

    a.swap(&mut b);
    assert_eq!((a.len(), b.len()), (5, 3));

    let mut c: Vector<(), _> = Vector::new_in(Pinned::new(2));
    c.move_assign(&mut a);
    assert_eq!((c.len(), a.len(), a.capacity()), (5, 0, 0));
}

#[test]
fn length_limit() {
    let max = isize::MAX as usize;

    let mut vec: Vector<()> = Vector::with_capacity(max);
    assert_eq!(vec.max_capacity(), max);
    unsafe { vec.set_len(max) };

    let range = vec.cursor_range();
    assert!(range.start < range.end);
    assert_eq!(range.end - range.start, isize::MAX);

    vec.erase_cursor_range(range.start..range.start + 1);
    assert_eq!(vec.len(), max - 1);

    assert!(vec.try_reserve(2).is_err());
    assert!(Vector::<()>::try_with_capacity(max + 1).is_err());
    assert!(ContiguousStorage::<()>::try_with_capacity_in(usize::MAX, Global).is_err());
}
