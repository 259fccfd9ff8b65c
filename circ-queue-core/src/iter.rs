//! Cursors and iterators over a [`CircularQueue`].
//!
//! Everything here borrows the queue, so the borrow checker rules out the
//! invalidation the raw positions would otherwise be exposed to.

use core::{cmp::Ordering, fmt, iter::FusedIterator, ptr, slice};

use crate::{index::SlotIndex, queue::CircularQueue};

/// Shared, forward-moving position in a queue.
///
/// Two cursors are equal only if they point into the same queue instance at
/// the same slot. Ordering is by distance from the front and is undefined
/// (`None`) between different queues.
pub struct Cursor<'a, T, I: SlotIndex = u32> {
    queue: &'a CircularQueue<T, I>,
    pos: I,
}

impl<'a, T, I: SlotIndex> Cursor<'a, T, I> {
    #[inline]
    pub(crate) fn new(queue: &'a CircularQueue<T, I>, pos: I) -> Self {
        Self { queue, pos }
    }

    /// Physical slot index.
    #[inline]
    #[must_use]
    pub fn position(&self) -> I {
        self.pos
    }

    /// Element under the cursor, or `None` past the back.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.queue.live(self.pos.as_usize())
    }

    /// Step one slot forward, wrapping at the end of the block.
    #[inline]
    pub fn move_next(&mut self) {
        self.pos = I::truncate((self.pos.as_usize() + 1) & self.queue.mask().as_usize());
    }

    #[inline]
    pub(crate) fn move_prev(&mut self) {
        let mask = self.queue.mask().as_usize();
        self.pos = I::truncate(self.pos.as_usize().wrapping_sub(1) & mask);
    }

    /// Distance from the front of the queue.
    #[inline]
    fn offset(&self) -> usize {
        self.pos
            .as_usize()
            .wrapping_sub(self.queue.start().as_usize())
            & self.queue.mask().as_usize()
    }
}

impl<T, I: SlotIndex> Clone for Cursor<'_, T, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, I: SlotIndex> Copy for Cursor<'_, T, I> {}

impl<T, I: SlotIndex> PartialEq for Cursor<'_, T, I> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.queue, other.queue) && self.pos == other.pos
    }
}

impl<T, I: SlotIndex> Eq for Cursor<'_, T, I> {}

impl<T, I: SlotIndex> PartialOrd for Cursor<'_, T, I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !ptr::eq(self.queue, other.queue) {
            return None;
        }
        Some(self.offset().cmp(&other.offset()))
    }
}

impl<T, I: SlotIndex> fmt::Debug for Cursor<'_, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("position", &self.pos).finish()
    }
}

/// Mutable, forward-moving position in a queue.
pub struct CursorMut<'a, T, I: SlotIndex = u32> {
    queue: &'a mut CircularQueue<T, I>,
    pos: I,
}

impl<'a, T, I: SlotIndex> CursorMut<'a, T, I> {
    #[inline]
    pub(crate) fn new(queue: &'a mut CircularQueue<T, I>, pos: I) -> Self {
        Self { queue, pos }
    }

    /// Physical slot index.
    #[inline]
    #[must_use]
    pub fn position(&self) -> I {
        self.pos
    }

    /// True once the cursor has moved past the back element.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.pos == self.queue.stop()
    }

    /// Element under the cursor, or `None` past the back.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.queue.live(self.pos.as_usize())
    }

    /// Mutable element under the cursor, or `None` past the back.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.queue.live_mut(self.pos.as_usize())
    }

    /// Step one slot forward, wrapping at the end of the block.
    #[inline]
    pub fn move_next(&mut self) {
        self.pos = I::truncate((self.pos.as_usize() + 1) & self.queue.mask().as_usize());
    }
}

impl<T: fmt::Debug, I: SlotIndex> fmt::Debug for CursorMut<'_, T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.pos)
            .field("current", &self.get())
            .finish()
    }
}

/// Front-to-back iterator over shared references.
pub struct Iter<'a, T, I: SlotIndex = u32> {
    front: Cursor<'a, T, I>,
    back: Cursor<'a, T, I>,
    remaining: usize,
}

impl<'a, T, I: SlotIndex> Iter<'a, T, I> {
    #[inline]
    pub(crate) fn new(front: Cursor<'a, T, I>, back: Cursor<'a, T, I>, remaining: usize) -> Self {
        Self {
            front,
            back,
            remaining,
        }
    }
}

impl<T, I: SlotIndex> Clone for Iter<'_, T, I> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T, I: SlotIndex> Iterator for Iter<'a, T, I> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.front.get();
        self.front.move_next();
        self.remaining -= 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, I: SlotIndex> DoubleEndedIterator for Iter<'a, T, I> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.back.move_prev();
        self.remaining -= 1;
        self.back.get()
    }
}

impl<T, I: SlotIndex> ExactSizeIterator for Iter<'_, T, I> {}

impl<T, I: SlotIndex> FusedIterator for Iter<'_, T, I> {}

/// Front-to-back iterator over mutable references.
pub struct IterMut<'a, T> {
    inner: core::iter::Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>,
}

impl<'a, T> IterMut<'a, T> {
    #[inline]
    pub(crate) fn new(head: &'a mut [T], tail: &'a mut [T]) -> Self {
        Self {
            inner: head.iter_mut().chain(tail.iter_mut()),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Draining iterator. Elements are removed front to back; whatever is left
/// when it is dropped is dropped too.
pub struct Drain<'a, T, I: SlotIndex = u32> {
    queue: &'a mut CircularQueue<T, I>,
}

impl<'a, T, I: SlotIndex> Drain<'a, T, I> {
    #[inline]
    pub(crate) fn new(queue: &'a mut CircularQueue<T, I>) -> Self {
        Self { queue }
    }
}

impl<T, I: SlotIndex> Iterator for Drain<'_, T, I> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.pop_front().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T, I: SlotIndex> DoubleEndedIterator for Drain<'_, T, I> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.queue.pop_back().ok()
    }
}

impl<T, I: SlotIndex> ExactSizeIterator for Drain<'_, T, I> {}

impl<T, I: SlotIndex> FusedIterator for Drain<'_, T, I> {}

impl<T, I: SlotIndex> Drop for Drain<'_, T, I> {
    fn drop(&mut self) {
        self.queue.clear();
    }
}

/// Owning iterator, front to back.
pub struct IntoIter<T, I: SlotIndex = u32> {
    queue: CircularQueue<T, I>,
}

impl<T, I: SlotIndex> IntoIter<T, I> {
    #[inline]
    pub(crate) fn new(queue: CircularQueue<T, I>) -> Self {
        Self { queue }
    }
}

impl<T, I: SlotIndex> Iterator for IntoIter<T, I> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.queue.pop_front().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl<T, I: SlotIndex> DoubleEndedIterator for IntoIter<T, I> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.queue.pop_back().ok()
    }
}

impl<T, I: SlotIndex> ExactSizeIterator for IntoIter<T, I> {}

impl<T, I: SlotIndex> FusedIterator for IntoIter<T, I> {}
