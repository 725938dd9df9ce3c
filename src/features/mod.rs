#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

#[cfg(any(feature = "allocator-api2-02", feature = "allocator-api2-04"))]
mod allocator_util;

#[cfg(feature = "allocator-api2-02")]
pub mod allocator_api2_02;

#[cfg(feature = "allocator-api2-04")]
pub mod allocator_api2_04;
