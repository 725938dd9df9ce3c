use core::mem::ManuallyDrop;
use std::hint::black_box;

use crate::{ContiguousStorage, Vector, alloc::Global};

macro_rules! zst_or_not {
    (
        $(
            $name:ident
        )*
    ) => {
        $(
            mod $name {
                #[test]
                #[cfg_attr(not(panic = "unwind"), ignore = "test requires unwinding support")]
                fn non_zst() {
                    super::$name::<i32>();
                }

                #[test]
                #[cfg_attr(not(panic = "unwind"), ignore = "test requires unwinding support")]
                fn zst() {
                    super::$name::<()>();
                }
            }
        )*
    };
}

zst_or_not! {
    storage_fill

    storage_copy

    from_elem_in

    from_slice_in

    extend_from_slice

    assign_fill_in_place

    assign_fill_reallocating

    resize

    into_iter

    erase
}

fn five<T: Testable>() -> ManuallyDrop<[Wrap<T>; 5]> {
    ManuallyDrop::new([
        Wrap(T::default()),
        Wrap(T::default()),
        Wrap(T::default()),
        Wrap(T::default()),
        Wrap(T::default()),
    ])
}

fn storage_fill<T: Testable>() {
    cfg().max_clones(3).expected_drops(4).run(|| {
        let mut storage: ContiguousStorage<Wrap<T>> = ContiguousStorage::with_capacity(5);
        let value = Wrap(T::default());
        unsafe { storage.uninitialized_fill_n(0, 5, &value) };
    });
}

fn storage_copy<T: Testable>() {
    cfg().max_clones(3).expected_drops(3).run(|| {
        let original = five::<T>();
        let mut storage: ContiguousStorage<Wrap<T>> = ContiguousStorage::with_capacity(5);
        unsafe { storage.uninitialized_copy(0, &*original) };
    });
}

fn from_elem_in<T: Testable>() {
    cfg().max_clones(3).expected_drops(4).run(|| {
        let _vec = Vector::from_elem_in(Wrap(T::default()), 5, Global);
    });
}

fn from_slice_in<T: Testable>() {
    cfg().max_clones(2).expected_drops(2).run(|| {
        let original = five::<T>();
        let _vec = Vector::from_slice_in(&*original, Global);
    });
}

fn extend_from_slice<T: Testable>() {
    let mut vec: Vector<Wrap<T>> = Vector::new();
    let slice = five::<T>();

    cfg().max_clones(3).expected_drops(3).run(|| {
        vec.extend_from_slice(&*slice);
    });

    assert_eq!(vec.len(), 0);

    // make sure the vector is still usable
    vec.push(Wrap(T::default()));
    for item in vec {
        black_box(item);
    }
}

fn assign_fill_in_place<T: Testable>() {
    let mut vec: Vector<Wrap<T>> = Vector::with_capacity(8);
    vec.push(Wrap(T::default()));

    // one clone replaces the live element, two new clones succeed and the third panics
    cfg().max_clones(3).expected_drops(4).run(|| {
        vec.assign_fill(6, Wrap(T::default()));
    });

    assert_eq!(vec.len(), 1);
    drop(vec);
}

fn assign_fill_reallocating<T: Testable>() {
    let mut vec: Vector<Wrap<T>> = Vector::with_capacity(1);
    vec.push(Wrap(T::default()));
    let ptr = vec.as_ptr();

    cfg().max_clones(2).expected_drops(3).run(|| {
        vec.assign_fill(4, Wrap(T::default()));
    });

    // the replacement is built off to the side, so the receiver is untouched
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.as_ptr(), ptr);
}

fn resize<T: Testable>() {
    let mut vec: Vector<Wrap<T>> = Vector::new();

    cfg().max_clones(2).expected_drops(3).run(|| {
        vec.resize(5, Wrap(T::default()));
    });

    assert_eq!(vec.len(), 0);
}

fn into_iter<T: Testable>() {
    cfg().expected_drops(5).expected_msg("whoops").run(|| {
        let vec: Vector<Wrap<T>> = Vector::from_iter_in((0..5).map(|_| Wrap(T::default())), Global);

        #[allow(clippy::manual_assert)]
        for (i, _) in vec.into_iter().enumerate() {
            if i == 3 {
                panic!("whoops");
            }
        }
    });
}

fn erase<T: Testable>() {
    let mut vec: Vector<Wrap<T>> = Vector::from_iter_in((0..5).map(|_| Wrap(T::default())), Global);

    // the first erased element panics on drop, the second still drops
    cfg().panicking_drop(1).expected_drops(2).expected_msg("drop panicked").run(|| {
        vec.erase(1..3);
    });

    assert_eq!(vec.len(), 3);
    drop(vec);
}

use helper::{Testable, Wrap, cfg};

mod helper {
    use core::{
        cell::Cell,
        panic::{AssertUnwindSafe, RefUnwindSafe, UnwindSafe},
    };
    use std::string::String;

    pub(super) trait Testable: Clone + Default + UnwindSafe + RefUnwindSafe {}
    impl Testable for i32 {}
    impl Testable for () {}

    thread_local! {
        static MAX_CLONES: Cell<usize> = const { Cell::new(0) };
        static CLONES: Cell<usize> = const { Cell::new(0) };
        static DROPS: Cell<usize> = const { Cell::new(0) };
        static PANICKING_DROP: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Default)]
    pub(super) struct Cfg {
        max_clones: Option<usize>,
        panicking_drop: Option<usize>,
        expected_drops: usize,
        msg: Option<&'static str>,
    }

    impl Cfg {
        pub(super) fn max_clones(mut self, amount: usize) -> Self {
            self.max_clones = Some(amount);
            self
        }

        /// Makes the `nth` drop inside `run` panic, counting from one.
        pub(super) fn panicking_drop(mut self, nth: usize) -> Self {
            self.panicking_drop = Some(nth);
            self
        }

        pub(super) fn expected_drops(mut self, amount: usize) -> Self {
            self.expected_drops = amount;
            self
        }

        pub(super) fn expected_msg(mut self, msg: &'static str) -> Self {
            self.msg = Some(msg);
            self
        }

        pub(super) fn run(self, f: impl FnOnce()) {
            let Self {
                max_clones,
                panicking_drop,
                expected_drops,
                msg,
            } = self;
            let msg = msg.unwrap_or("too many clones");

            MAX_CLONES.set(max_clones.unwrap_or(usize::MAX));
            PANICKING_DROP.set(panicking_drop.unwrap_or(0));
            let panic = catch(AssertUnwindSafe(f)).unwrap_err();
            assert_eq!(panic, msg);
            assert_eq!(DROPS.get(), expected_drops);

            MAX_CLONES.set(0);
            PANICKING_DROP.set(0);
            CLONES.set(0);
            DROPS.set(0);
        }
    }

    pub(super) fn cfg() -> Cfg {
        Cfg::default()
    }

    pub(super) struct Wrap<T>(pub(super) T);

    impl<T: UnwindSafe> UnwindSafe for Wrap<T> {}
    impl<T: RefUnwindSafe> RefUnwindSafe for Wrap<T> {}

    impl<T: Clone> Clone for Wrap<T> {
        fn clone(&self) -> Self {
            let count = CLONES.get();
            if count >= MAX_CLONES.get() {
                panic!("too many clones");
            } else {
                CLONES.set(count + 1);
                Wrap(self.0.clone())
            }
        }
    }

    impl<T> Drop for Wrap<T> {
        fn drop(&mut self) {
            let drops = DROPS.get() + 1;
            DROPS.set(drops);

            if drops == PANICKING_DROP.get() {
                panic!("drop panicked");
            }
        }
    }

    fn catch<F: FnOnce() -> R + UnwindSafe, R>(f: F) -> Result<R, String> {
        match std::panic::catch_unwind(f) {
            Ok(r) => Ok(r),
            Err(err) => {
                if let Some(&err) = err.downcast_ref::<&str>() {
                    return Err(err.into());
                }

                if let Some(err) = err.downcast_ref::<String>() {
                    return Err(err.clone());
                }

                Err("panicked".into())
            }
        }
    }
}
