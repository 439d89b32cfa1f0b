//! Shared buffers and group-aggregated slot allocation for level outputs.
//!
//! Every construction level appends child tasks and leaves to preallocated
//! output arrays. Allocation is aggregated per worker group: the plan phase
//! reduces each group's output counts, a single exclusive scan hands every
//! group one contiguous base per output array, and the scatter phase writes
//! into the reserved slots without further coordination. This is the CPU
//! rendition of warp-aggregated allocation: one reservation per group, a
//! contiguous slot range per group, and order-preserving slot assignment as a
//! bonus the GPU variant does not give.

use std::cell::UnsafeCell;

use crate::types::BuildError;

/// Fixed-capacity buffer written concurrently at disjoint indices.
///
/// The write phase holds `&self` across many threads; the reservation scan
/// guarantees every index is written by exactly one worker. Reading back via
/// [`filled`](SlotBuffer::filled) requires `&mut self`, so the borrow checker
/// rules out overlap between the write and read phases.
pub(crate) struct SlotBuffer<T> {
  slots: Box<[UnsafeCell<T>]>,
}

// Writers target disjoint slots and readers wait for exclusive access, so
// sharing across threads is sound for any sendable payload.
unsafe impl<T: Send> Sync for SlotBuffer<T> {}

impl<T: Copy + Default> SlotBuffer<T> {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: (0..capacity).map(|_| UnsafeCell::new(T::default())).collect(),
    }
  }

  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Grow to at least `capacity` slots. Existing contents are not preserved;
  /// callers only grow between levels when the buffer is logically empty.
  pub fn ensure_capacity(&mut self, capacity: usize) {
    if self.slots.len() < capacity {
      *self = Self::with_capacity(capacity);
    }
  }

  /// Write `value` into `index`. Each index must be written by at most one
  /// worker per level, and no reads may happen until the level barrier.
  #[inline]
  pub fn write(&self, index: usize, value: T) {
    unsafe { *self.slots[index].get() = value }
  }

  /// View the first `len` slots. Exclusive access ends the write phase.
  pub fn filled(&mut self, len: usize) -> &[T] {
    assert!(len <= self.slots.len());
    // UnsafeCell<T> is repr(transparent) over T.
    unsafe { std::slice::from_raw_parts(self.slots.as_ptr() as *const T, len) }
  }
}

/// Per-group output counts reduced during the plan phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GroupCounts {
  /// Child tasks the group will append to the output queue.
  pub tasks: u32,
  /// Leaves the group will append to the leaf array.
  pub leaves: u32,
}

/// Contiguous output bases handed to one group for the scatter phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GroupBases {
  /// First output-queue slot owned by the group.
  pub tasks: u32,
  /// First leaf index owned by the group.
  pub leaves: u32,
}

/// Exclusive scan over group counts, assigning each group its output bases.
///
/// Leaf bases continue from `leaf_start`, the number of leaves already
/// committed by earlier levels. Capacity is checked here, before any slot is
/// written, so a would-be overflow aborts the build with the sink untouched
/// by this level.
pub(crate) fn reserve_level_slots(
  counts: &[GroupCounts],
  leaf_start: u32,
  task_capacity: u32,
  leaf_capacity: u32,
) -> Result<(Vec<GroupBases>, GroupCounts), BuildError> {
  let mut bases = Vec::with_capacity(counts.len());
  let mut task_next = 0u64;
  let mut leaf_next = leaf_start as u64;

  for group in counts {
    bases.push(GroupBases {
      tasks: task_next as u32,
      leaves: leaf_next as u32,
    });
    task_next += group.tasks as u64;
    leaf_next += group.leaves as u64;
  }

  if task_next > task_capacity as u64 {
    return Err(BuildError::CapacityExceeded {
      needed: task_next as usize,
      capacity: task_capacity as usize,
    });
  }
  if leaf_next > leaf_capacity as u64 {
    return Err(BuildError::CapacityExceeded {
      needed: leaf_next as usize,
      capacity: leaf_capacity as usize,
    });
  }

  let totals = GroupCounts {
    tasks: task_next as u32,
    leaves: (leaf_next - leaf_start as u64) as u32,
  };
  Ok((bases, totals))
}
