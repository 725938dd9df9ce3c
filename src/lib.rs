// NB: Methods that can fail to allocate are written once as a `generic_*` function over `ErrorBehavior`
// and then exposed twice, as a panicking method and as a `try_*` method (see `error_behavior_generic_methods`).

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(
    clippy::pedantic,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_docs,
    rustdoc::missing_crate_level_docs
)]
#![allow(
    clippy::inline_always,
    clippy::module_name_repetitions,
    clippy::items_after_statements,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
#![doc(test(attr(warn(dead_code))))]
//! A growable, contiguous, allocator-parameterized vector.
//!
//! [`Vector<T, A>`](Vector) owns exactly one heap buffer obtained from its allocator `A`.
//! It keeps a logical length that is separate from the allocated capacity,
//! constructs and destroys its elements explicitly and follows the allocator's
//! [propagation policy](alloc::Propagation) when it is copied, moved or swapped.
//!
//! ```
//! use contiguous_vec::Vector;
//!
//! let mut vec: Vector<i32> = Vector::from_elem(7, 3);
//! assert_eq!(vec, [7, 7, 7]);
//!
//! vec.push(8);
//! vec.erase(0..2);
//! assert_eq!(vec, [7, 8]);
//!
//! vec.assign_fill(5, 1);
//! assert_eq!(vec, [1, 1, 1, 1, 1]);
//! ```
//!
//! # Layers
//! - [`ContiguousStorage`] owns the buffer and the allocator. It allocates, reallocates and frees memory,
//!   constructs and destroys ranges of slots and implements the allocator propagation algorithm.
//!   It does not know which slots are initialized.
//! - [`Vector`] owns a storage and a length. Slots `[0, len)` are live, slots `[len, capacity)` are not.
//! - [`overlapped_copy`](overlapped_copy::overlapped_copy) and [`overlapped_move`](overlapped_copy::overlapped_move)
//!   shift ranges that may overlap. The vector uses them to close the gap left by an erase and to open one for an insert.
//! - [`Cursor`] is a raw random-access position. Its arithmetic and comparisons come from [`CursorFacade`].
//!
//! # Allocator propagation
//! Every [`Allocator`](alloc::Allocator) carries a compile time [`Propagation`](alloc::Propagation) record that decides
//! whether the allocator travels along with the data on [`clone_from`](Vector::clone_from),
//! [`move_assign`](Vector::move_assign) and [`swap`](Vector::try_swap):
//! ```
//! use contiguous_vec::{Vector, alloc::{Allocator, Global, Propagation}};
//!
//! assert!(<Global as Allocator>::PROPAGATION.on_move_assign);
//! assert!(!<Global as Allocator>::PROPAGATION.on_copy_assign);
//!
//! let mut a: Vector<i32> = Vector::from_elem(1, 2);
//! let mut b: Vector<i32> = Vector::from_elem(2, 4);
//!
//! // `Global` instances always compare equal, so swapping can never fail
//! a.try_swap(&mut b).unwrap();
//! assert_eq!(a, [2, 2, 2, 2]);
//! assert_eq!(b, [1, 1]);
//! ```
//!
//! # Feature Flags
//! * **`std`** *(enabled by default)*: Adds [`System`](alloc::System) and `std::io::Write` for `Vector<u8, A>`.
//! * **`panic-on-alloc`** *(enabled by default)*: Adds functions and trait implementations that panic when an allocation fails.
//!   Without it only the `try_*` methods are available.
//! * **`serde`**: Adds `Serialize` and `Deserialize` implementations for [`Vector`].
//! * **`tracing`**: Emits `trace` level events for buffer allocations, releases and allocator propagation.
//! * **`allocator-api2-02`**: Makes `Global` implement `allocator_api2` version `0.2`'s `Allocator` and adds a compatibility wrapper.
//! * **`allocator-api2-04`**: Makes `Global` implement `allocator_api2` version `0.4`'s `Allocator` and adds a compatibility wrapper.

extern crate alloc as alloc_crate;

pub mod alloc;
/// Contains [`Cursor`] and the [`CursorFacade`] trait.
pub mod cursor;
mod error;
mod error_behavior;
mod features;
mod init_guard;
/// Contains the overlap-safe range copy routines.
pub mod overlapped_copy;
mod polyfill;
/// Contains [`ContiguousStorage`].
pub mod storage;
/// Contains [`Vector`] and associated types.
pub mod vector;

pub use cursor::{Cursor, CursorFacade};
pub use error::{AllocError, AllocatorMismatchOnSwap};
pub use storage::ContiguousStorage;
#[doc(inline)]
pub use vector::Vector;

use core::mem;
#[cfg(feature = "panic-on-alloc")]
use core::convert::Infallible;

pub(crate) trait SizedTypeProperties: Sized {
    const SIZE: usize = mem::size_of::<Self>();
    const ALIGN: usize = mem::align_of::<Self>();
    const IS_ZST: bool = Self::SIZE == 0;
    /// Slot offsets must fit in an `isize`, even for zero-sized types.
    const MAX_SLOTS: usize = isize::MAX as usize / if Self::IS_ZST { 1 } else { Self::SIZE };
}

impl<T> SizedTypeProperties for T {}

#[cfg(feature = "panic-on-alloc")]
#[inline(always)]
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cold]
#[inline(never)]
#[cfg(feature = "panic-on-alloc")]
pub(crate) const fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

macro_rules! trace_event {
    ($($tt:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($tt)*);
    }};
}

pub(crate) use trace_event;

macro_rules! wrap_result {
    (, $err:ty) => { Result<(), $err> };
    ($ok:ty, $err:ty) => { Result<$ok, $err> };
}

pub(crate) use wrap_result;

macro_rules! error_behavior_generic_methods {
    (
        $(
            $(#[$attr:meta])*
            impl

            $(#[$attr_infallible:meta])*
            for fn $infallible:ident

            $(#[$attr_fallible:meta])*
            for fn $fallible:ident

            use fn $generic:ident
            $(<{$($generic_params:tt)*}>)?
            (
                $(&mut $self_mut:ident ,)?
                $($arg_pat:ident: $arg_ty:ty),* $(,)?
            )
            $(-> $return_ty:ty)?
            $(where { $($where:tt)* } in)?
            {
                $($body:tt)*
            }
        )*
    ) => {
        $(
            $(#[$attr])*
            $(#[$attr_infallible])*
            ///
            /// # Panics
            /// Panics if the allocation fails.
            #[inline(always)]
            #[cfg(feature = "panic-on-alloc")]
            pub fn $infallible
            $(<$($generic_params)*>)?
            ($(&mut $self_mut,)? $($arg_pat: $arg_ty),*) $(-> $return_ty)?
            $(where $($where)*)?
            {
                $crate::infallible(Self::$generic($($self_mut,)? $($arg_pat),*))
            }

            $(#[$attr])*
            $(#[$attr_fallible])*
            ///
            /// # Errors
            /// Errors if the allocation fails.
            #[inline(always)]
            pub fn $fallible
            $(<$($generic_params)*>)?
            ($(&mut $self_mut,)? $($arg_pat: $arg_ty),*)
            -> $crate::wrap_result!($($return_ty)?, $crate::AllocError)
            $(where $($where)*)?
            {
                Self::$generic($($self_mut,)? $($arg_pat),*)
            }

            #[inline]
            pub(crate) fn $generic
            <E: $crate::error_behavior::ErrorBehavior $(, $($generic_params)*)?>
            ($(&mut $self_mut,)? $($arg_pat: $arg_ty),*)
            -> $crate::wrap_result!($($return_ty)?, E)
            $(where $($where)*)?
            {
                $($body)*
            }
        )*
    };
}

pub(crate) use error_behavior_generic_methods;

#[cfg(test)]
mod tests;
