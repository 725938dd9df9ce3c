use thiserror::Error;

/// The error type for allocation failures.
///
/// Returned by the `try_*` methods when the allocator fails to provide memory
/// or when the requested capacity would exceed `isize::MAX` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("memory allocation failed")]
pub struct AllocError;

/// The error returned by [`Vector::try_swap`](crate::Vector::try_swap) and
/// [`ContiguousStorage::try_swap`](crate::ContiguousStorage::try_swap).
///
/// Swapping exchanges the buffers of two containers. When their allocators do not
/// [propagate on swap](crate::alloc::Propagation::on_swap) each container keeps its allocator,
/// which is only sound if both allocators can free each other's memory, i.e. if they compare equal.
/// Neither container is modified when this error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("swap called on containers whose allocators do not propagate on swap and compare non-equal")]
pub struct AllocatorMismatchOnSwap;
