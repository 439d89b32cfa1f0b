use super::*;

#[test]
fn test_pivot_mixed_range() {
  let codes = [0b000, 0b001, 0b011, 0b100, 0b101, 0b111];

  // Bit 2 flips at index 3.
  assert_eq!(find_split_pivot(&codes, 0b100), 3);
  // Bit 1: 0b011 is the first code with it set.
  assert_eq!(find_split_pivot(&codes, 0b010), 2);
}

#[test]
fn test_pivot_all_on_one_side() {
  let codes = [0b000, 0b001, 0b010];

  // No code has bit 2 set: pivot lands past the end.
  assert_eq!(find_split_pivot(&codes, 0b100), codes.len());
  // Every code has bit 3 clear and bit 0..2 irrelevant for mask 0.
  let high = [0b100, 0b101, 0b111];
  assert_eq!(find_split_pivot(&high, 0b100), 0);
}

#[test]
fn test_pivot_degenerate_slices() {
  assert_eq!(find_split_pivot(&[], 0b1), 0);
  assert_eq!(find_split_pivot(&[0b1], 0b1), 0);
  assert_eq!(find_split_pivot(&[0b0], 0b1), 1);
}

#[test]
fn test_leading_difference_skips_agreed_bits() {
  // Codes agree on bits 7..3, disagree first at bit 2.
  let lo = 0b1010_0001;
  let hi = 0b1010_0110;

  assert_eq!(find_leading_bit_difference(7, lo, hi), 2);
  assert_eq!(find_leading_bit_difference(2, lo, hi), 2);
  // Ceiling below the difference hides it.
  assert_eq!(find_leading_bit_difference(1, lo, hi), 1);
  assert_eq!(find_leading_bit_difference(0, lo, hi), 0);
}

#[test]
fn test_leading_difference_identical_codes() {
  assert_eq!(find_leading_bit_difference(31, 0xDEAD_BEEF, 0xDEAD_BEEF), -1);
  assert_eq!(find_leading_bit_difference(0, 0, 0), -1);
}

#[test]
fn test_leading_difference_masks_above_start() {
  // Only bit 5 differs; a start below it reports agreement.
  let lo = 0b00_0000;
  let hi = 0b10_0000;

  assert_eq!(find_leading_bit_difference(5, lo, hi), 5);
  assert_eq!(find_leading_bit_difference(4, lo, hi), -1);
}

#[test]
fn test_leading_difference_full_width() {
  assert_eq!(find_leading_bit_difference(31, 0, u32::MAX), 31);
  assert_eq!(find_leading_bit_difference(31, 0, 1), 0);
}

#[test]
fn test_leading_difference_exhausted_start() {
  assert_eq!(find_leading_bit_difference(-1, 0, u32::MAX), -1);
}
