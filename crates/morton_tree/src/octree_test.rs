use super::*;

#[test]
fn test_leaf_node() {
  let node = OctreeNode::leaf(300);

  assert!(node.is_leaf());
  assert_eq!(node.child_mask(), 0);
  assert_eq!(node.child_offset(), 300);
}

#[test]
fn test_internal_node_accessors() {
  let node = OctreeNode::internal(0b1011_0101, 4096);

  assert!(!node.is_leaf());
  assert_eq!(node.child_mask(), 0b1011_0101);
  assert_eq!(node.child_offset(), 4096);
  assert!(node.is_active(0));
  assert!(!node.is_active(1));
  assert!(node.is_active(7));
}

#[test]
fn test_octant_ranks_match_naive_popcount() {
  let mask: u8 = 0b1011_0101;
  let node = OctreeNode::internal(mask, 100);

  for i in 0..8u32 {
    let expected = if mask & (1 << i) == 0 {
      INVALID_OCTANT
    } else {
      // Rank of octant i = number of active octants below it.
      let below = (mask as u32 & ((1 << i) - 1)).count_ones();
      100 + below
    };
    assert_eq!(node.octant(i), expected, "octant {i} of mask {mask:#010b}");
  }
}

#[test]
fn test_octant_of_full_and_single_masks() {
  let full = OctreeNode::internal(0xFF, 8);
  for i in 0..8u32 {
    assert_eq!(full.octant(i), 8 + i);
  }

  let single = OctreeNode::internal(0b0100_0000, 50);
  assert_eq!(single.octant(6), 50);
  assert_eq!(single.octant(5), INVALID_OCTANT);
}

#[test]
fn test_raw_roundtrip() {
  let node = OctreeNode::internal(0b0011_1100, 777);
  assert_eq!(OctreeNode::from_raw(node.raw()), node);
}
