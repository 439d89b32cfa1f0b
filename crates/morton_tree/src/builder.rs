//! Breadth-first construction driver.
//!
//! The driver owns two task queues and ping-pongs them: every pass consumes
//! the input queue in parallel through the split kernel, collects child tasks
//! in the output queue, swaps the two, and moves one code bit down. The level
//! counter is only a termination ceiling; tasks carry their own (possibly
//! skipped-ahead) split bit. Once the counter runs out, whatever tasks remain
//! are finalised into leaves.
//!
//! ```text
//! sorted codes ──► seed root task ──► [ split level ⇄ queue swap ]* ──► finalise
//!                                                                        │
//!                                              nodes[], leaves[] ◄───────┘
//! ```

use web_time::Instant;

use crate::alloc::SlotBuffer;
use crate::split::{finalize_leaves, split_level};
use crate::tree::TreeWriter;
use crate::types::{BuildConfig, BuildError, MortonCode, SplitTask, MAX_CODES};

/// One task queue: preallocated slots plus the live length.
struct TaskQueue {
  slots: SlotBuffer<SplitTask>,
  len: u32,
}

impl TaskQueue {
  fn with_capacity(capacity: usize) -> Self {
    Self {
      slots: SlotBuffer::with_capacity(capacity),
      len: 0,
    }
  }
}

/// Reusable construction state: the two task queues.
///
/// Queues grow to the input size on demand and are retained across builds, so
/// a context amortises its allocations over repeated rebuilds.
pub struct BuildContext {
  queues: [TaskQueue; 2],
}

impl Default for BuildContext {
  fn default() -> Self {
    Self::new()
  }
}

impl BuildContext {
  /// Context with empty queues; they grow on first use.
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Context with queues preallocated for `n_codes` inputs.
  pub fn with_capacity(n_codes: usize) -> Self {
    Self {
      queues: [
        TaskQueue::with_capacity(n_codes),
        TaskQueue::with_capacity(n_codes),
      ],
    }
  }

  /// Build the radix tree for `codes` into `tree`.
  ///
  /// `codes` must be sorted ascending. Node 0 is the root; on success the
  /// returned stats carry the record counts, on error the sink contents are
  /// indeterminate.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "morton_tree::build", fields(n_codes = codes.len()))
  )]
  pub fn build<W: TreeWriter>(
    &mut self,
    codes: &[MortonCode],
    config: &BuildConfig,
    tree: &mut W,
  ) -> Result<BuildStats, BuildError> {
    validate_input(codes, config)?;

    let n = codes.len() as u32;
    let start = Instant::now();

    for queue in &mut self.queues {
      queue.slots.ensure_capacity(codes.len());
      queue.len = 0;
    }

    tree.reserve_nodes(codes.len().div_ceil(config.max_leaf_size as usize) * 2);
    tree.reserve_leaves(codes.len());

    // Seed the root: the whole range, splitting from the most significant bit.
    self.queues[0]
      .slots
      .write(0, SplitTask::new(0, 0, n, config.bits as i32 - 1));
    self.queues[0].len = 1;

    let mut n_nodes: u32 = 1;
    let mut leaf_count: u32 = 0;
    let mut levels: u32 = 0;
    let mut in_queue = 0;
    let mut level = config.bits as i32 - 1;

    while self.queues[in_queue].len > 0 && level >= 0 {
      let in_len = self.queues[in_queue].len as usize;
      tree.reserve_nodes(n_nodes as usize + 2 * in_len);

      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("split_level", level, tasks = in_len).entered();

      let (head, tail) = self.queues.split_at_mut(1);
      let (input, output) = if in_queue == 0 {
        (&mut head[0], &mut tail[0])
      } else {
        (&mut tail[0], &mut head[0])
      };

      let in_tasks = input.slots.filled(in_len);
      let (new_tasks, new_leaves) = split_level(
        codes,
        config,
        in_tasks,
        &output.slots,
        leaf_count,
        n,
        n_nodes,
        tree,
      )?;

      input.len = 0;
      output.len = new_tasks;
      n_nodes += new_tasks;
      leaf_count += new_leaves;
      levels += 1;

      in_queue = 1 - in_queue;
      level -= 1;
    }

    // Bits ran out with tasks left: everything remaining becomes a leaf.
    let leftover = self.queues[in_queue].len as usize;
    if leftover > 0 {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("finalize_leaves", tasks = leftover).entered();

      let input = &mut self.queues[in_queue];
      let in_tasks = input.slots.filled(leftover);
      leaf_count += finalize_leaves(in_tasks, leaf_count, n, tree)?;
      input.len = 0;
    }

    Ok(BuildStats {
      nodes: n_nodes,
      leaves: leaf_count,
      levels,
      build_time_us: start.elapsed().as_micros() as u64,
    })
  }
}

/// Build a radix tree with a one-shot context.
///
/// Prefer [`BuildContext::build`] when rebuilding repeatedly; it reuses the
/// task queues across builds.
pub fn build<W: TreeWriter>(
  codes: &[MortonCode],
  config: &BuildConfig,
  tree: &mut W,
) -> Result<BuildStats, BuildError> {
  BuildContext::with_capacity(codes.len()).build(codes, config, tree)
}

/// Statistics from one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
  /// Total node records written, internal and leaf records together.
  /// Node 0 is the root.
  pub nodes: u32,
  /// Total leaves written.
  pub leaves: u32,
  /// Split passes executed, not counting finalisation.
  pub levels: u32,
  /// Wall-clock build time in microseconds.
  pub build_time_us: u64,
}

fn validate_input(codes: &[MortonCode], config: &BuildConfig) -> Result<(), BuildError> {
  if config.bits == 0 || config.bits > 32 {
    return Err(BuildError::InvalidBits { bits: config.bits });
  }
  if config.max_leaf_size == 0 {
    return Err(BuildError::InvalidLeafSize);
  }
  if codes.is_empty() {
    return Err(BuildError::EmptyInput);
  }
  if codes.len() > MAX_CODES {
    return Err(BuildError::TooManyCodes { count: codes.len() });
  }
  if let Some(i) = codes.windows(2).position(|pair| pair[0] > pair[1]) {
    return Err(BuildError::UnsortedInput { index: i + 1 });
  }
  Ok(())
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
