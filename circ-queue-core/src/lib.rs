//! Core implementation for circ_queue.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
mod index;
mod iter;
mod queue;
mod slots;

#[cfg(test)]
mod tests;

pub use error::QueueError;
pub use index::{SlotIndex, checked_round_up_pow2, round_up_pow2};
pub use iter::{Cursor, CursorMut, Drain, IntoIter, Iter, IterMut};
pub use queue::{CircularQueue, Deque};
