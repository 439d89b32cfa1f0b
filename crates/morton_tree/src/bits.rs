//! Bit-level primitives for radix splitting.
//!
//! Splitting a sorted code range on bit `k` reduces to two questions: where
//! does bit `k` flip from 0 to 1, and is bit `k` worth splitting on at all.
//! Both helpers are pure and allocation-free.

use crate::types::MortonCode;

/// Find the partitioning pivot: the smallest index in `codes` whose value has
/// any bit of `mask` set.
///
/// `codes` must be sorted ascending, which makes the masked predicate
/// monotone. Returns `codes.len()` when no element has the bit set and `0`
/// when every element does.
#[inline]
pub fn find_split_pivot(codes: &[MortonCode], mask: MortonCode) -> usize {
  codes.partition_point(|&code| code & mask == 0)
}

/// Highest bit index `<= start` on which `lo` and `hi` disagree, or −1 if
/// they agree on every bit of `[0..=start]`.
///
/// Because the input range is sorted, its endpoints bracket every code in
/// between: bits on which the endpoints agree are shared by the whole range,
/// so splitting on them would leave one side empty. Jumping straight to the
/// leading difference prunes those wasted levels.
#[inline]
pub fn find_leading_bit_difference(start: i32, lo: MortonCode, hi: MortonCode) -> i32 {
  debug_assert!(start < 32);
  if start < 0 {
    return -1;
  }
  let mask = if start == 31 {
    u32::MAX
  } else {
    (1u32 << (start + 1)) - 1
  };
  let diff = (lo ^ hi) & mask;
  if diff == 0 {
    -1
  } else {
    31 - diff.leading_zeros() as i32
  }
}

#[cfg(test)]
#[path = "bits_test.rs"]
mod bits_test;
