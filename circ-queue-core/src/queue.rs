//! Growable ring-buffer deque with bitmask wraparound.

use alloc::vec::Vec;
use core::{cmp, fmt};

use snafu::{OptionExt, ensure};

use crate::{
    error::{CapacityOverflowSnafu, EmptyQueueSnafu, InvalidResizeSnafu, QueueError},
    index::{SlotIndex, checked_round_up_pow2},
    iter::{Cursor, CursorMut, Drain, IntoIter, Iter, IterMut},
    slots::Slots,
};

/// Double-ended queue stored in one power-of-two block of slots.
///
/// Live elements occupy the wrapped half-open range `[start, stop)`. One slot
/// is always left unused so that `start == stop` means empty; a queue with
/// `2^k` slots therefore holds at most `2^k - 1` elements before it doubles.
///
/// `I` is the integer used for `start`, `stop` and `mask`. Its width caps
/// the capacity (see [`SlotIndex`]); growth past it fails with
/// [`QueueError::CapacityOverflow`].
///
/// Not synchronized: mutation needs `&mut self`.
pub struct CircularQueue<T, I: SlotIndex = u32> {
    slots: Slots<T>,
    mask: I,
    start: I,
    stop: I,
}

/// [`CircularQueue`] indexed by `usize`.
pub type Deque<T> = CircularQueue<T, usize>;

/// Power-of-two slot count for `requested` slots, if `I` can address it.
fn slot_count<I: SlotIndex>(requested: usize) -> Result<usize, QueueError> {
    I::from_usize(requested)
        .and_then(checked_round_up_pow2)
        .map(SlotIndex::as_usize)
        .filter(|&slots| slots >= requested)
        .context(CapacityOverflowSnafu { requested })
}

impl<T, I: SlotIndex> CircularQueue<T, I> {
    /// Create a queue that holds at least `requested` elements without growing.
    ///
    /// One sentinel slot is added and the total rounded up to a power of two,
    /// so `CircularQueue::new(3)` allocates 4 slots and `new(4)` allocates 8.
    pub fn new(requested: usize) -> Result<Self, QueueError> {
        let slots = slot_count::<I>(requested.saturating_add(1))?;
        let storage = Slots::try_alloc(slots)?;
        tracing::trace!(requested, slots, "allocated circular queue");
        Ok(Self {
            slots: storage,
            mask: I::truncate(slots - 1),
            start: I::ZERO,
            stop: I::ZERO,
        })
    }

    #[inline(always)]
    fn mask_usize(&self) -> usize {
        self.mask.as_usize()
    }

    #[inline(always)]
    fn wrap(&self, i: usize) -> I {
        I::truncate(i & self.mask_usize())
    }

    /// `(first physical index, elements before the end of the block, elements wrapped to 0)`.
    #[inline]
    fn segments(&self) -> (usize, usize, usize) {
        let start = self.start.as_usize();
        let len = self.len();
        let head = cmp::min(len, self.slots.len() - start);
        (start, head, len - head)
    }

    /// Number of live elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stop.as_usize().wrapping_sub(self.start.as_usize()) & self.mask_usize()
    }

    /// Alias for [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// True if empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Elements the queue can hold before the next push grows it (`mask`).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.mask_usize()
    }

    /// Allocated slot count, including the sentinel. Zero after [`release`](Self::release).
    #[inline]
    #[must_use]
    pub fn capacity_slots(&self) -> usize {
        self.slots.len()
    }

    /// Physical index of the front element.
    #[inline]
    #[must_use]
    pub fn start(&self) -> I {
        self.start
    }

    /// Physical index one past the back element.
    #[inline]
    #[must_use]
    pub fn stop(&self) -> I {
        self.stop
    }

    /// `capacity_slots - 1`.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> I {
        self.mask
    }

    /// Write `value` at `stop` and advance it.
    ///
    /// # Safety
    /// The queue must have room: `len() < capacity()`.
    #[inline]
    unsafe fn push_unchecked(&mut self, value: T) -> &mut T {
        let stop = self.stop.as_usize();
        let next = self.wrap(stop + 1);
        let slot = unsafe { self.slots.write(stop, value) };
        self.stop = next;
        slot
    }

    /// Append a value built by `make` once room for it is guaranteed.
    ///
    /// `make` is not called if growing the queue fails.
    pub fn push_back_with<F>(&mut self, make: F) -> Result<&mut T, QueueError>
    where
        F: FnOnce() -> T,
    {
        if self.wrap(self.stop.as_usize() + 1) == self.start {
            self.grow()?;
        }
        Ok(unsafe { self.push_unchecked(make()) })
    }

    /// Append `value` at the back, doubling the block first if it is full.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Result<&mut T, QueueError> {
        self.push_back_with(|| value)
    }

    /// Alias for [`push_back`](Self::push_back).
    #[inline]
    pub fn push(&mut self, value: T) -> Result<&mut T, QueueError> {
        self.push_back(value)
    }

    /// Append `T::from(args)`, converting only after room is guaranteed.
    #[inline]
    pub fn emplace_back<A>(&mut self, args: A) -> Result<&mut T, QueueError>
    where
        T: From<A>,
    {
        self.push_back_with(|| T::from(args))
    }

    /// Remove and return the front element.
    pub fn pop_front(&mut self) -> Result<T, QueueError> {
        ensure!(!self.is_empty(), EmptyQueueSnafu);
        let start = self.start.as_usize();
        let value = unsafe { self.slots.take(start) };
        self.start = self.wrap(start + 1);
        Ok(value)
    }

    /// Alias for [`pop_front`](Self::pop_front).
    #[inline]
    pub fn pop(&mut self) -> Result<T, QueueError> {
        self.pop_front()
    }

    /// Remove and return the back element.
    pub fn pop_back(&mut self) -> Result<T, QueueError> {
        ensure!(!self.is_empty(), EmptyQueueSnafu);
        let stop = self.wrap(self.stop.as_usize().wrapping_sub(1));
        self.stop = stop;
        Ok(unsafe { self.slots.take(stop.as_usize()) })
    }

    /// Pop the front element and push `value` at the back in one step.
    ///
    /// Occupancy is unchanged, so this never allocates. Fails with
    /// [`QueueError::EmptyQueue`] without pushing when the queue is empty.
    pub fn push_pop(&mut self, value: T) -> Result<T, QueueError> {
        let front = self.pop_front()?;
        unsafe { self.push_unchecked(value) };
        Ok(front)
    }

    /// Front element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        Some(unsafe { self.slots.get(self.start.as_usize()) })
    }

    /// Mutable front element, or `None` if empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        Some(unsafe { self.slots.get_mut(self.start.as_usize()) })
    }

    /// Back element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let last = self.wrap(self.stop.as_usize().wrapping_sub(1));
        Some(unsafe { self.slots.get(last.as_usize()) })
    }

    /// Mutable back element, or `None` if empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        let last = self.wrap(self.stop.as_usize().wrapping_sub(1));
        Some(unsafe { self.slots.get_mut(last.as_usize()) })
    }

    /// Element `index` positions behind the front.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        let pos = self.wrap(self.start.as_usize() + index);
        Some(unsafe { self.slots.get(pos.as_usize()) })
    }

    /// Mutable element `index` positions behind the front.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let pos = self.wrap(self.start.as_usize() + index);
        Some(unsafe { self.slots.get_mut(pos.as_usize()) })
    }

    /// Element at physical slot `pos`, if that slot is live.
    #[inline]
    pub(crate) fn live(&self, pos: usize) -> Option<&T> {
        let offset = pos.wrapping_sub(self.start.as_usize()) & self.mask_usize();
        if pos >= self.slots.len() || offset >= self.len() {
            return None;
        }
        Some(unsafe { self.slots.get(pos) })
    }

    #[inline]
    pub(crate) fn live_mut(&mut self, pos: usize) -> Option<&mut T> {
        let offset = pos.wrapping_sub(self.start.as_usize()) & self.mask_usize();
        if pos >= self.slots.len() || offset >= self.len() {
            return None;
        }
        Some(unsafe { self.slots.get_mut(pos) })
    }

    /// Visit every element, front to back.
    pub fn for_each<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut T),
    {
        let stop = self.stop.as_usize();
        let mut i = self.start.as_usize();
        while i != stop {
            visit(unsafe { self.slots.get_mut(i) });
            i = (i + 1) & self.mask_usize();
        }
    }

    /// The live range as two slices: the part up to the end of the block,
    /// then the part that wrapped to index 0.
    #[inline]
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (start, head, tail) = self.segments();
        unsafe { (self.slots.slice(start, head), self.slots.slice(0, tail)) }
    }

    /// Mutable form of [`as_slices`](Self::as_slices).
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (start, head, tail) = self.segments();
        unsafe { self.slots.slices_mut(start, head, tail) }
    }

    /// Move every element out into a `Vec`, front to back.
    ///
    /// The queue is left empty with its allocation intact.
    pub fn to_vec(&mut self) -> Vec<T> {
        self.drain().collect()
    }

    /// Drop every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        let mask = self.mask_usize();
        let stop = self.stop.as_usize();
        let mut i = self.start.as_usize();
        // Reset first: a panicking destructor leaks the remainder, never double-drops.
        self.start = I::ZERO;
        self.stop = I::ZERO;
        while i != stop {
            unsafe { self.slots.destroy(i) };
            i = (i + 1) & mask;
        }
    }

    /// Drop every element and free the block.
    ///
    /// The queue is left with zero slots. Pushing to it again reallocates.
    pub fn release(&mut self) {
        self.clear();
        let slots = self.slots.len();
        self.slots = Slots::empty();
        self.mask = I::ZERO;
        tracing::debug!(slots, "released circular queue storage");
    }

    /// Alias for [`release`](Self::release).
    #[inline]
    pub fn free(&mut self) {
        self.release();
    }

    /// Double the slot count. Called when a push would fill the sentinel slot.
    fn grow(&mut self) -> Result<(), QueueError> {
        let target = (self.mask_usize() + 1)
            .checked_mul(2)
            .context(CapacityOverflowSnafu {
                requested: usize::MAX,
            })?;
        self.resize(target)
    }

    /// Grow the block to `target_slots` rounded up to a power of two.
    ///
    /// Fails with [`QueueError::InvalidResize`] if `target_slots` is below
    /// [`capacity`](Self::capacity). Targets at or below the current slot
    /// count are a no-op. Live elements keep their order and are laid out
    /// from index 0 in the new block.
    ///
    /// The new block is allocated before anything is moved, so any error
    /// leaves the queue untouched.
    pub fn resize(&mut self, target_slots: usize) -> Result<(), QueueError> {
        let capacity = self.capacity();
        ensure!(
            target_slots >= capacity,
            InvalidResizeSnafu {
                requested: target_slots,
                capacity,
            }
        );
        let new_slots = slot_count::<I>(target_slots)?;
        if new_slots <= self.slots.len() {
            return Ok(());
        }

        let mut fresh = Slots::try_alloc(new_slots)?;
        let len = self.len();
        // Covers all three layouts: empty at an offset (both counts zero),
        // contiguous (tail zero) and wrapped.
        let (start, head, tail) = self.segments();
        unsafe {
            self.slots.move_into(start, &mut fresh, 0, head);
            self.slots.move_into(0, &mut fresh, head, tail);
        }

        let old_slots = self.slots.len();
        self.slots = fresh;
        self.start = I::ZERO;
        self.stop = I::truncate(len);
        self.mask = I::truncate(new_slots - 1);
        tracing::debug!(old_slots, new_slots, len, "grew circular queue");
        Ok(())
    }

    /// Make room for `additional` more elements without further growth.
    pub fn reserve(&mut self, additional: usize) -> Result<(), QueueError> {
        let needed = self
            .len()
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
            .context(CapacityOverflowSnafu {
                requested: usize::MAX,
            })?;
        if needed <= self.slots.len() {
            return Ok(());
        }
        self.resize(needed)
    }

    /// Push every item of `iter`, stopping at the first error.
    pub fn try_extend<It>(&mut self, iter: It) -> Result<(), QueueError>
    where
        It: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0)?;
        for item in iter {
            self.push_back(item)?;
        }
        Ok(())
    }

    /// Shared cursor on the front element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T, I> {
        Cursor::new(self, self.start)
    }

    /// Shared cursor one past the back element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T, I> {
        Cursor::new(self, self.stop)
    }

    /// Mutable cursor on the front element.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, I> {
        let start = self.start;
        CursorMut::new(self, start)
    }

    /// Iterate front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, I> {
        Iter::new(self.begin(), self.end(), self.len())
    }

    /// Iterate mutably, front to back.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (head, tail) = self.as_mut_slices();
        IterMut::new(head, tail)
    }

    /// Remove elements front to back as an iterator.
    ///
    /// Elements not consumed are dropped with the iterator.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, I> {
        Drain::new(self)
    }

    /// Clone into a block of the same slot count, reporting allocation failure.
    ///
    /// Only live elements are cloned; they start at index 0 in the copy.
    pub fn try_clone(&self) -> Result<Self, QueueError>
    where
        T: Clone,
    {
        let slots = Slots::try_alloc(self.slots.len())?;
        Ok(self.clone_into_slots(slots))
    }

    fn clone_into_slots(&self, slots: Slots<T>) -> Self
    where
        T: Clone,
    {
        let mut copy = Self {
            slots,
            mask: self.mask,
            start: I::ZERO,
            stop: I::ZERO,
        };
        for item in self {
            // copy.len() < self.len() <= capacity()
            unsafe { copy.push_unchecked(item.clone()) };
        }
        copy
    }
}

impl<T, I: SlotIndex> Drop for CircularQueue<T, I> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// A queue with no slots and no allocation; the first push allocates.
impl<T, I: SlotIndex> Default for CircularQueue<T, I> {
    fn default() -> Self {
        Self {
            slots: Slots::empty(),
            mask: I::ZERO,
            start: I::ZERO,
            stop: I::ZERO,
        }
    }
}

impl<T: Clone, I: SlotIndex> Clone for CircularQueue<T, I> {
    fn clone(&self) -> Self {
        self.clone_into_slots(Slots::alloc(self.slots.len()))
    }
}

impl<T: fmt::Debug, I: SlotIndex> fmt::Debug for CircularQueue<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, I: SlotIndex> PartialEq for CircularQueue<T, I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, I: SlotIndex> Eq for CircularQueue<T, I> {}

impl<T, I: SlotIndex> IntoIterator for CircularQueue<T, I> {
    type Item = T;
    type IntoIter = IntoIter<T, I>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, I: SlotIndex> IntoIterator for &'a CircularQueue<T, I> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, I>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, I: SlotIndex> IntoIterator for &'a mut CircularQueue<T, I> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
