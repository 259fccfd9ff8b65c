//! Owned slot storage backing the queue.

use alloc::{boxed::Box, vec::Vec};
use core::{mem::MaybeUninit, ptr};

use snafu::OptionExt;

use crate::error::{AllocationFailureSnafu, QueueError};

/// One exclusively owned block of uninitialized cells.
///
/// `Slots` never drops the values it holds: which cells are live is the
/// owner's business. It only frees the block itself.
pub(crate) struct Slots<T> {
    cells: Box<[MaybeUninit<T>]>,
}

impl<T> Slots<T> {
    /// A block with no cells and no allocation.
    #[inline]
    pub(crate) fn empty() -> Self {
        Self {
            cells: Box::default(),
        }
    }

    /// Allocate `len` cells, reporting allocator failure instead of aborting.
    pub(crate) fn try_alloc(len: usize) -> Result<Self, QueueError> {
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .ok()
            .context(AllocationFailureSnafu { slots: len })?;
        cells.resize_with(len, MaybeUninit::uninit);
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Allocate `len` cells; aborts on allocator failure like `Vec`.
    pub(crate) fn alloc(len: usize) -> Self {
        let mut cells = Vec::with_capacity(len);
        cells.resize_with(len, MaybeUninit::uninit);
        Self {
            cells: cells.into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Construct a value in cell `idx`.
    ///
    /// # Safety
    /// `idx < len()` and the cell must not hold a live value (it would leak).
    #[inline]
    pub(crate) unsafe fn write(&mut self, idx: usize, value: T) -> &mut T {
        unsafe { self.cells.get_unchecked_mut(idx).write(value) }
    }

    /// Move the value out of cell `idx`, leaving it logically uninitialized.
    ///
    /// # Safety
    /// `idx < len()` and the cell must hold a live value.
    #[inline]
    pub(crate) unsafe fn take(&mut self, idx: usize) -> T {
        unsafe { self.cells.get_unchecked(idx).assume_init_read() }
    }

    /// Drop the value in cell `idx` in place.
    ///
    /// # Safety
    /// `idx < len()` and the cell must hold a live value.
    #[inline]
    pub(crate) unsafe fn destroy(&mut self, idx: usize) {
        unsafe { self.cells.get_unchecked_mut(idx).assume_init_drop() }
    }

    /// # Safety
    /// `idx < len()` and the cell must hold a live value.
    #[inline]
    pub(crate) unsafe fn get(&self, idx: usize) -> &T {
        unsafe { self.cells.get_unchecked(idx).assume_init_ref() }
    }

    /// # Safety
    /// `idx < len()` and the cell must hold a live value.
    #[inline]
    pub(crate) unsafe fn get_mut(&mut self, idx: usize) -> &mut T {
        unsafe { self.cells.get_unchecked_mut(idx).assume_init_mut() }
    }

    /// View `[from, from + count)` as initialized values.
    ///
    /// # Safety
    /// The range must be in bounds and every cell in it live.
    #[inline]
    pub(crate) unsafe fn slice(&self, from: usize, count: usize) -> &[T] {
        unsafe {
            let base = self.cells.as_ptr().add(from).cast::<T>();
            core::slice::from_raw_parts(base, count)
        }
    }

    /// Split the live range into its two mutable physical parts:
    /// `[from, from + head)` and `[0, tail)`.
    ///
    /// # Safety
    /// Both ranges must be in bounds, disjoint, and fully live.
    #[inline]
    pub(crate) unsafe fn slices_mut(
        &mut self,
        from: usize,
        head: usize,
        tail: usize,
    ) -> (&mut [T], &mut [T]) {
        unsafe {
            let base = self.cells.as_mut_ptr().cast::<T>();
            (
                core::slice::from_raw_parts_mut(base.add(from), head),
                core::slice::from_raw_parts_mut(base, tail),
            )
        }
    }

    /// Bitwise-move `count` cells starting at `from` into `dst` at `to`.
    ///
    /// The source cells become logically uninitialized.
    ///
    /// # Safety
    /// Both ranges must be in bounds; `dst` cells must not hold live values.
    #[inline]
    pub(crate) unsafe fn move_into(
        &self,
        from: usize,
        dst: &mut Slots<T>,
        to: usize,
        count: usize,
    ) {
        unsafe {
            ptr::copy_nonoverlapping(
                self.cells.as_ptr().add(from),
                dst.cells.as_mut_ptr().add(to),
                count,
            );
        }
    }
}
