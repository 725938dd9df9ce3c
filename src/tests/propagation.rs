use std::string::{String, ToString};

use crate::{
    Vector,
    alloc::{Allocator, Global, Propagation},
};

use super::{DropCounter, Pinned, Roaming, Tagged};

type CopyOnly = Tagged<true, false, false>;
type MoveOnly = Tagged<false, true, false>;
type SwapOnly = Tagged<false, false, true>;

fn strings<A: Allocator>(items: &[&str], allocator: A) -> Vector<String, A> {
    Vector::from_iter_in(items.iter().map(ToString::to_string), allocator)
}

#[test]
fn policies() {
    assert_eq!(<Global as Allocator>::PROPAGATION, Propagation::STATELESS);
    assert_eq!(<&Global as Allocator>::PROPAGATION, Propagation::STATELESS);
    assert_eq!(<Pinned as Allocator>::PROPAGATION, Propagation::NEVER);
    assert_eq!(<Roaming as Allocator>::PROPAGATION, Propagation::ALWAYS);
    assert_eq!(Propagation::default(), Propagation::NEVER);
    assert_eq!(
        Propagation::ALWAYS.with_on_swap(false).with_always_equal(true),
        Propagation {
            on_copy_assign: true,
            on_move_assign: true,
            on_swap: false,
            always_equal: true,
        }
    );
}

#[test]
fn clone_from_keeps_allocator_without_propagation() {
    let mut dst = strings(&["a", "b", "c"], Pinned::new(1));
    let src = strings(&["x", "y"], Pinned::new(2));

    dst.clone_from(&src);

    assert_eq!(dst, ["x", "y"]);
    assert_eq!(dst.allocator().id(), 1);
    assert_eq!(dst.capacity(), 3);
}

#[test]
fn clone_from_propagates_and_frees_old_buffer() {
    let old = CopyOnly::new(1);
    let new = CopyOnly::new(2);
    let counter = DropCounter::default();

    let mut dst = Vector::from_elem_in(counter.token(), 4, old.clone());
    let src = Vector::from_elem_in(counter.token(), 1, new.clone());
    assert_eq!(counter.drops(), 2);

    dst.clone_from(&src);

    assert_eq!(counter.drops(), 6);
    assert_eq!(dst.len(), 1);
    assert_eq!(dst.allocator().id(), 2);
    assert_eq!(old.live_allocations(), 0);
    assert_eq!(new.live_allocations(), 2);
}

#[test]
fn clone_from_with_equal_propagating_allocator_reuses_buffer() {
    let allocator = CopyOnly::new(1);
    let mut dst = strings(&["a", "b", "c", "d"], allocator.clone());
    let src = strings(&["x", "y"], allocator.clone());
    let ptr = dst.as_ptr();

    dst.clone_from(&src);

    assert_eq!(dst, ["x", "y"]);
    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(allocator.live_allocations(), 2);
}

#[test]
fn clone_keeps_allocator() {
    let vec = strings(&["a", "b"], Pinned::new(4));
    let clone = vec.clone();

    assert_eq!(clone, vec);
    assert_eq!(clone.allocator().id(), 4);
    assert_eq!(vec.allocator().live_allocations(), 2);
}

#[test]
fn move_assign_adopts_with_propagation() {
    let mut dst = strings(&["a"], MoveOnly::new(1));
    let mut src = strings(&["x", "y", "z"], MoveOnly::new(2));
    let ptr = src.as_ptr();

    dst.move_assign(&mut src);

    assert_eq!(dst, ["x", "y", "z"]);
    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(dst.allocator().id(), 2);

    assert_eq!((src.len(), src.capacity()), (0, 0));
    assert_eq!(src.allocator().id(), 2);
}

#[test]
fn move_assign_adopts_from_equal_allocator() {
    let allocator = Pinned::new(1);
    let mut dst = strings(&["a"], allocator.clone());
    let mut src = strings(&["x", "y"], allocator.clone());
    let ptr = src.as_ptr();

    dst.move_assign(&mut src);

    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(dst, ["x", "y"]);
    assert_eq!(allocator.live_allocations(), 1);
}

#[test]
fn move_assign_relocates_without_propagation() {
    let ours = Pinned::new(1);
    let theirs = Pinned::new(2);
    let mut dst = strings(&["a"], ours.clone());
    let mut src = strings(&["x", "y", "z"], theirs.clone());
    let ptr = src.as_ptr();

    dst.move_assign(&mut src);

    assert_eq!(dst, ["x", "y", "z"]);
    assert_ne!(dst.as_ptr(), ptr);
    assert_eq!(dst.allocator().id(), 1);
    assert_eq!(ours.live_allocations(), 1);

    assert_eq!((src.len(), src.capacity()), (0, 0));
    assert_eq!(theirs.live_allocations(), 0);

    src.push("again".to_string());
    assert_eq!(src, ["again"]);
}

#[test]
fn swap_exchanges_allocators_with_propagation() {
    let mut a = strings(&["a"], SwapOnly::new(1));
    let mut b = strings(&["x", "y"], SwapOnly::new(2));

    a.swap(&mut b);

    assert_eq!((a.allocator().id(), b.allocator().id()), (2, 1));
    assert_eq!(a, ["x", "y"]);
    assert_eq!(b, ["a"]);
}

#[test]
fn swap_equal_allocators_without_propagation() {
    let allocator = Pinned::new(1);
    let mut a = strings(&["a"], allocator.clone());
    let mut b = strings(&["x", "y"], allocator);

    a.try_swap(&mut b).unwrap();

    assert_eq!(a, ["x", "y"]);
    assert_eq!(b, ["a"]);
}

#[test]
fn swap_mismatch_changes_nothing() {
    let mut a = strings(&["a"], Pinned::new(1));
    let mut b = strings(&["x", "y"], Pinned::new(2));

    assert!(a.try_swap(&mut b).is_err());

    assert_eq!((a.allocator().id(), b.allocator().id()), (1, 2));
    assert_eq!(a, ["a"]);
    assert_eq!(b, ["x", "y"]);
}

#[test]
#[should_panic = "allocators do not propagate on swap"]
fn swap_mismatch_panics() {
    let mut a: Vector<u8, _> = Vector::new_in(Pinned::new(1));
    let mut b: Vector<u8, _> = Vector::new_in(Pinned::new(2));
    a.swap(&mut b);
}

#[test]
fn swap_twice_restores() {
    let mut a = strings(&["a", "b"], Roaming::new(1));
    let mut b = strings(&["x"], Roaming::new(2));

    a.swap(&mut b);
    a.swap(&mut b);

    assert_eq!((a.allocator().id(), b.allocator().id()), (1, 2));
    assert_eq!(a, ["a", "b"]);
    assert_eq!(b, ["x"]);
}

#[test]
fn assign_fill_over_capacity_keeps_allocator() {
    let allocator = Pinned::new(7);
    let mut vec = Vector::from_elem_in(1u32, 2, allocator.clone());

    vec.assign_fill(10, 3);

    assert_eq!(vec.len(), 10);
    assert!(vec.iter().all(|&x| x == 3));
    assert_eq!(vec.allocator(), &allocator);
    assert_eq!(allocator.live_allocations(), 1);
}

#[test]
fn take_keeps_allocator() {
    let mut vec = strings(&["a"], Pinned::new(5));
    let taken = vec.take();

    assert_eq!(taken, ["a"]);
    assert_eq!(taken.allocator().id(), 5);
    assert_eq!(vec.allocator().id(), 5);
    assert_eq!((vec.len(), vec.capacity()), (0, 0));
}
