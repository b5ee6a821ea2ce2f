//! Board Model (C1): pure index/row/column helpers plus the mirroring rule.
//!
//! Mirroring is load-bearing: a projectile or column cast from
//! column C on one side targets column C on the other side — the same
//! index, never inverted. Because both sides share one `index / 3 ==
//! column` mapping, mirroring falls out of the index arithmetic for free.

use crate::enums::{RowSlot, Side};

/// Which row a Main-board index belongs to, from its own side's
/// perspective.
pub fn row_of(index: usize, side: Side) -> RowSlot {
    match (side, index % 3) {
        (Side::P1, 0) => RowSlot::Back,
        (Side::P1, 1) => RowSlot::Middle,
        (Side::P1, _) => RowSlot::Front,
        (Side::P2, 0) => RowSlot::Front,
        (Side::P2, 1) => RowSlot::Middle,
        (Side::P2, _) => RowSlot::Back,
    }
}

pub fn slot_for_index(side: Side, index: usize) -> RowSlot {
    row_of(index, side)
}

/// Which column a Main-board index belongs to. Identical for both sides —
/// this identity is exactly why mirroring needs no inversion.
pub fn column_of(index: usize, _side: Side) -> usize {
    index / 3
}

/// The three indices of a column, in front-to-back order for `side`.
pub fn column_indices(column: usize, side: Side) -> [usize; 3] {
    let base = column * 3;
    match side {
        Side::P1 => [base + 2, base + 1, base],
        Side::P2 => [base, base + 1, base + 2],
    }
}

/// Orthogonal neighbors of `index` on a 3x3 grid (same-side board, not
/// mirrored — used for `adjacent` targeting and pulse spread).
pub fn adjacent_indices(index: usize) -> Vec<usize> {
    let row = index / 3;
    let col = index % 3;
    let mut out = Vec::with_capacity(4);
    if row > 0 {
        out.push(index - 3);
    }
    if row < 2 {
        out.push(index + 3);
    }
    if col > 0 {
        out.push(index - 1);
    }
    if col < 2 {
        out.push(index + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p1_rows_run_back_to_front() {
        for &i in &[2, 5, 8] {
            assert_eq!(row_of(i, Side::P1), RowSlot::Front);
        }
        for &i in &[1, 4, 7] {
            assert_eq!(row_of(i, Side::P1), RowSlot::Middle);
        }
        for &i in &[0, 3, 6] {
            assert_eq!(row_of(i, Side::P1), RowSlot::Back);
        }
    }

    #[test]
    fn p2_rows_run_front_to_back() {
        for &i in &[0, 3, 6] {
            assert_eq!(row_of(i, Side::P2), RowSlot::Front);
        }
        for &i in &[2, 5, 8] {
            assert_eq!(row_of(i, Side::P2), RowSlot::Back);
        }
    }

    #[test]
    fn columns_are_not_inverted_across_sides() {
        for col in 0..3 {
            let p1 = column_indices(col, Side::P1);
            let p2 = column_indices(col, Side::P2);
            // Same *set* of raw indices (0,1,2 / 3,4,5 / 6,7,8) regardless of
            // which side owns the column; mirroring needs no remapping.
            let mut p1_sorted = p1;
            let mut p2_sorted = p2;
            p1_sorted.sort_unstable();
            p2_sorted.sort_unstable();
            assert_eq!(p1_sorted, p2_sorted);
        }
    }

    #[test]
    fn column_indices_front_to_back_order() {
        assert_eq!(column_indices(0, Side::P1), [2, 1, 0]);
        assert_eq!(column_indices(0, Side::P2), [0, 1, 2]);
    }
}
