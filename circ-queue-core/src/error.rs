//! Queue error type.

use snafu::Snafu;

/// Errors returned by [`CircularQueue`](crate::CircularQueue) operations.
///
/// A failed operation leaves the queue exactly as it was.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum QueueError {
    /// The allocator could not provide a block of `slots` cells.
    #[snafu(display("failed to allocate {slots} queue slots"))]
    AllocationFailure {
        /// Requested slot count.
        slots: usize,
    },

    /// Pop from a queue with no live elements.
    #[snafu(display("pop from empty queue"))]
    EmptyQueue,

    /// Explicit resize below the current capacity.
    #[snafu(display(
        "cannot resize to {requested} slots: queue already holds up to {capacity} elements"
    ))]
    InvalidResize {
        /// Requested slot count.
        requested: usize,
        /// Capacity (`mask`) at the time of the call.
        capacity: usize,
    },

    /// The slot count does not fit the queue's index type.
    #[snafu(display("{requested} slots exceed the range of the queue's index type"))]
    CapacityOverflow {
        /// Requested slot count, before rounding.
        requested: usize,
    },
}

impl QueueError {
    /// True for [`QueueError::EmptyQueue`].
    #[inline]
    #[must_use]
    pub const fn is_empty_queue(&self) -> bool {
        matches!(self, Self::EmptyQueue)
    }
}
