//! Level-splitting kernels.
//!
//! One invocation of [`split_level`] consumes every task of the current
//! level: each task either commits its range as a leaf or partitions it at
//! the pivot of its split bit, emitting child tasks for the next level. Work
//! runs in groups of [`GROUP_SIZE`] tasks across the rayon pool in two
//! bulk-synchronous phases:
//!
//! 1. **Plan**: every group classifies its tasks and reduces its output
//!    counts. No shared state is touched.
//! 2. **Scatter**: after one reservation scan on the host, every group owns
//!    a contiguous slot range per output array and writes child tasks, node
//!    records, and leaves without further coordination.
//!
//! Child node ids are `nodes_base + slot`, left before right, which couples
//! task emission to node-index allocation: a child task knows its own node id
//! the moment it is written.

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::alloc::{reserve_level_slots, GroupCounts, SlotBuffer};
use crate::bits::{find_leading_bit_difference, find_split_pivot};
use crate::tree::TreeWriter;
use crate::types::{BuildConfig, BuildError, MortonCode, SplitTask};

/// Tasks handled per slot reservation. Larger groups mean fewer reservations
/// and coarser load balancing; this is a tuning knob, not a correctness one.
pub(crate) const GROUP_SIZE: usize = 64;

/// Outcome of planning one task, before any slot is reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plan {
  /// The range becomes a leaf.
  Leaf,
  /// The range partitions at `pivot` on `bit`. Degenerate pivots (at either
  /// range end) emit a single forwarder child covering the whole range.
  Split { pivot: u32, bit: i32 },
}

/// Child tasks a planned split will emit: 0 for leaves, 1 for degenerate
/// splits, 2 for proper ones.
#[inline]
fn emitted_tasks(task: &SplitTask, plan: Plan) -> u32 {
  match plan {
    Plan::Leaf => 0,
    Plan::Split { pivot, .. } => {
      if pivot == task.begin || pivot == task.end {
        1
      } else {
        2
      }
    }
  }
}

/// Classify one task: leaf it out or find its partitioning pivot.
fn plan_task(codes: &[MortonCode], config: &BuildConfig, task: &SplitTask) -> Plan {
  let mut bit = task.bit;
  if !config.keep_singletons {
    bit = find_leading_bit_difference(
      bit,
      codes[task.begin as usize],
      codes[task.end as usize - 1],
    );
  }

  if task.span() <= config.max_leaf_size || bit < 0 {
    return Plan::Leaf;
  }

  let range = &codes[task.begin as usize..task.end as usize];
  let pivot = task.begin + find_split_pivot(range, 1 << bit) as u32;
  Plan::Split { pivot, bit }
}

/// Per-group result of the plan phase.
struct GroupPlan {
  plans: SmallVec<[Plan; GROUP_SIZE]>,
  counts: GroupCounts,
}

fn plan_group(codes: &[MortonCode], config: &BuildConfig, group: &[SplitTask]) -> GroupPlan {
  let plans: SmallVec<[Plan; GROUP_SIZE]> = group
    .iter()
    .map(|task| plan_task(codes, config, task))
    .collect();

  let mut counts = GroupCounts::default();
  for (task, &plan) in group.iter().zip(&plans) {
    match plan {
      Plan::Leaf => counts.leaves += 1,
      Plan::Split { .. } => counts.tasks += emitted_tasks(task, plan),
    }
  }

  GroupPlan { plans, counts }
}

/// Split every task of one level, writing node records for all of them and
/// appending child tasks and leaves to the output arrays.
///
/// `nodes_base` is the index the first child node produced by this call will
/// live at; `leaf_start` is the number of leaves committed by earlier levels.
/// Returns `(new_tasks, new_leaves)`. On a capacity error nothing of this
/// level has been written.
#[allow(clippy::too_many_arguments)]
pub(crate) fn split_level<W: TreeWriter>(
  codes: &[MortonCode],
  config: &BuildConfig,
  in_tasks: &[SplitTask],
  out_tasks: &SlotBuffer<SplitTask>,
  leaf_start: u32,
  leaf_capacity: u32,
  nodes_base: u32,
  tree: &W,
) -> Result<(u32, u32), BuildError> {
  // Phase 1: plan. Pivot searches dominate; groups proceed independently.
  let group_plans: Vec<GroupPlan> = in_tasks
    .par_chunks(GROUP_SIZE)
    .map(|group| plan_group(codes, config, group))
    .collect();

  // One reservation per group, checked before anything is written.
  let counts: Vec<GroupCounts> = group_plans.iter().map(|group| group.counts).collect();
  let (bases, totals) = reserve_level_slots(
    &counts,
    leaf_start,
    out_tasks.capacity() as u32,
    leaf_capacity,
  )?;

  // Phase 2: scatter into the reserved slot ranges.
  in_tasks
    .par_chunks(GROUP_SIZE)
    .enumerate()
    .for_each(|(group_index, group)| {
      let plans = &group_plans[group_index].plans;
      let mut task_slot = bases[group_index].tasks;
      let mut leaf_slot = bases[group_index].leaves;

      for (task, &plan) in group.iter().zip(plans) {
        match plan {
          Plan::Leaf => {
            tree.write_leaf(leaf_slot, task.begin, task.end);
            tree.write_node(task.node, false, false, leaf_slot);
            leaf_slot += 1;
          }
          Plan::Split { pivot, bit } => {
            let child = nodes_base + task_slot;
            let two = pivot != task.begin && pivot != task.end;

            // A degenerate pivot forwards the whole range one bit down.
            let left_end = if two { pivot } else { task.end };
            out_tasks.write(
              task_slot as usize,
              SplitTask::new(child, task.begin, left_end, bit - 1),
            );
            if two {
              out_tasks.write(
                task_slot as usize + 1,
                SplitTask::new(child + 1, pivot, task.end, bit - 1),
              );
            }

            tree.write_node(task.node, pivot != task.begin, pivot != task.end, child);
            task_slot += if two { 2 } else { 1 };
          }
        }
      }
    });

  Ok((totals.tasks, totals.leaves))
}

/// Turn every remaining task into a leaf. Invoked once, after the bit counter
/// has run out while tasks remain. No output tasks are produced, so slot
/// assignment degenerates to the task index.
pub(crate) fn finalize_leaves<W: TreeWriter>(
  in_tasks: &[SplitTask],
  leaf_start: u32,
  leaf_capacity: u32,
  tree: &W,
) -> Result<u32, BuildError> {
  let needed = leaf_start as u64 + in_tasks.len() as u64;
  if needed > leaf_capacity as u64 {
    return Err(BuildError::CapacityExceeded {
      needed: needed as usize,
      capacity: leaf_capacity as usize,
    });
  }

  in_tasks.par_iter().enumerate().for_each(|(i, task)| {
    let leaf = leaf_start + i as u32;
    tree.write_node(task.node, false, false, leaf);
    tree.write_leaf(leaf, task.begin, task.end);
  });

  Ok(in_tasks.len() as u32)
}

#[cfg(test)]
#[path = "split_test.rs"]
mod split_test;
