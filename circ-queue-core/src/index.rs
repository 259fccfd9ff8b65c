//! Index types and power-of-two rounding.
//!
//! The queue stores `start`, `stop` and `mask` in a caller-chosen unsigned
//! integer. Its width bounds the largest slot count the queue can reach:
//! slot counts are powers of two no larger than `2^(BITS - 1)`, so a `u8`
//! queue tops out at 128 slots (127 elements) and a `u32` queue at 2^31.

use core::fmt::Debug;
use core::hash::Hash;

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer usable as a ring index.
///
/// Sealed: implemented for `u8`, `u16`, `u32`, `u64` and `usize`.
pub trait SlotIndex: sealed::Sealed + Copy + Ord + Hash + Debug + Default + 'static {
    /// The value zero.
    const ZERO: Self;

    /// Width of the type in bits.
    const BITS: u32;

    /// Widen to `usize` for slot access.
    fn as_usize(self) -> usize;

    /// Narrow from `usize`, or `None` if the value does not fit.
    fn from_usize(n: usize) -> Option<Self>;

    /// Narrow from `usize`, discarding high bits. Only for values already
    /// masked into range.
    fn truncate(n: usize) -> Self;

    /// Smallest power of two `>= self`, by bit-smearing.
    ///
    /// Wraps: `0` and anything above the largest representable power of two
    /// round to `0`.
    fn round_up_pow2(self) -> Self;
}

macro_rules! impl_slot_index {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl SlotIndex for $ty {
            const ZERO: Self = 0;
            const BITS: u32 = <$ty>::BITS;

            #[inline(always)]
            fn as_usize(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn from_usize(n: usize) -> Option<Self> {
                <$ty>::try_from(n).ok()
            }

            #[inline(always)]
            fn truncate(n: usize) -> Self {
                n as $ty
            }

            #[inline]
            fn round_up_pow2(self) -> Self {
                let mut x = self.wrapping_sub(1);
                let mut shift = 1;
                while shift < <$ty>::BITS {
                    x |= x >> shift;
                    shift <<= 1;
                }
                x.wrapping_add(1)
            }
        }
    )*};
}

impl_slot_index!(u8, u16, u32, u64, usize);

/// Smallest power of two `>= x`. See [`SlotIndex::round_up_pow2`].
#[inline]
#[must_use]
pub fn round_up_pow2<I: SlotIndex>(x: I) -> I {
    x.round_up_pow2()
}

/// Smallest power of two `>= x`, or `None` if it is not representable in `I`.
///
/// Unlike [`round_up_pow2`], zero rounds to one.
#[inline]
#[must_use]
pub fn checked_round_up_pow2<I: SlotIndex>(x: I) -> Option<I> {
    if x == I::ZERO {
        return I::from_usize(1);
    }
    let rounded = x.round_up_pow2();
    if rounded == I::ZERO { None } else { Some(rounded) }
}
