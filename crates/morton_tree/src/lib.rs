//! morton_tree - data-parallel radix binary tree construction over sorted
//! Morton codes.
//!
//! Given N sorted 32-bit Morton codes, the builder produces a binary tree in
//! which every leaf covers a contiguous range of the input and every internal
//! node partitions its range by one code bit. The tree is the substrate for
//! spatial queries and for deriving an octree by folding three binary levels
//! into one 8-way level.
//!
//! Construction is breadth-first and bulk-synchronous: each level splits all
//! active ranges in parallel with a per-range binary search on the current
//! code bit, appends child tasks and leaves through group-aggregated slot
//! allocation, and ping-pongs two task queues between levels. Ranges whose
//! endpoints agree on the split bit skip straight to the next bit that
//! actually discriminates.
//!
//! # Features
//!
//! - **Bit-skip**: empty partitions are pruned by jumping to the leading bit
//!   difference of each range, unless `keep_singletons` asks for explicit
//!   forwarder chains
//! - **Pluggable sink**: construction is generic over a [`TreeWriter`]; the
//!   default [`BinaryTree`] packs one `u32` per node and one `u64` per leaf
//! - **Deterministic layout**: slot allocation is order-preserving, so
//!   identical inputs rebuild byte-identical trees
//! - **Reusable context**: [`BuildContext`] keeps the task queues alive
//!   across rebuilds
//!
//! # Example
//!
//! ```
//! use morton_tree::{build, BinaryTree, BuildConfig};
//!
//! let codes: Vec<u32> = vec![0b000, 0b001, 0b101, 0b110, 0b111];
//! let config = BuildConfig::default().with_bits(3).with_max_leaf_size(2);
//!
//! let mut tree = BinaryTree::new();
//! let stats = build(&codes, &config, &mut tree).unwrap();
//!
//! // Leaves partition the input: contiguous, in order, nothing missing.
//! let leaves = tree.collect_leaves();
//! assert_eq!(leaves.len(), stats.leaves as usize);
//! assert_eq!(leaves.first().unwrap().0, 0);
//! assert_eq!(leaves.last().unwrap().1, codes.len() as u32);
//! ```

pub mod bits;
pub mod builder;
pub mod octree;
pub mod tree;
pub mod types;

mod alloc;
mod split;

// Re-exports
pub use builder::{build, BuildContext, BuildStats};
pub use octree::{OctreeNode, INVALID_OCTANT};
pub use tree::{BinaryNode, BinaryTree, TreeWriter};
pub use types::{BuildConfig, BuildError, MortonCode, SplitTask, MAX_CODES};
