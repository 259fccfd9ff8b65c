//! A growable double-ended queue in one contiguous, power-of-two block.
//!
//! Elements live in a single allocation whose slot count is always a power
//! of two, so wrapping an index is `i & mask` rather than `i % len`. One slot
//! stays free as a sentinel: `start == stop` always means empty. When a push
//! would use the sentinel, the block doubles and the live range is laid out
//! again from index 0.
//!
//! ```
//! use circ_queue::{CircularQueue, QueueError};
//!
//! let mut queue = CircularQueue::<&str>::new(3)?;
//! assert_eq!(queue.capacity(), 3);
//!
//! for item in ["a", "b", "c", "d"] {
//!     queue.push_back(item)?;
//! }
//! // The fourth push doubled the block from 4 to 8 slots.
//! assert_eq!(queue.capacity(), 7);
//!
//! assert_eq!(queue.pop_front()?, "a");
//! assert_eq!(queue.pop_back()?, "d");
//! assert_eq!(queue.to_vec(), ["b", "c"]);
//! assert_eq!(queue.pop_front(), Err(QueueError::EmptyQueue));
//! # Ok::<(), QueueError>(())
//! ```
//!
//! The index type is a parameter. A narrow one keeps the header small and
//! caps the capacity:
//!
//! ```
//! use circ_queue::{CircularQueue, QueueError};
//!
//! let mut small = CircularQueue::<u64, u8>::new(100)?;
//! assert_eq!(small.capacity_slots(), 128);
//! assert!(matches!(small.resize(1000), Err(QueueError::CapacityOverflow { .. })));
//! # Ok::<(), QueueError>(())
//! ```
//!
//! The queue is not synchronized. Share it across threads behind a lock.

#![cfg_attr(not(feature = "std"), no_std)]

pub use circ_queue_core::*;
