//! Neighbor table for the 4x4 board.
//!
//! Adjacency depends only on the board's shape, so it is computed once and shared.

use std::sync::LazyLock;

use crate::board::{CELL_COUNT, GRID_SIZE};

/// For each cell, its orthogonal and diagonal neighbors (3 in a corner, 5 on an edge,
/// 8 inside), in row-major order.
static NEIGHBORS: LazyLock<[Vec<usize>; CELL_COUNT]> = LazyLock::new(|| {
    std::array::from_fn(|pos| {
        let (row, col) = (pos / GRID_SIZE, pos % GRID_SIZE);
        let mut out = Vec::with_capacity(8);
        for r in row.saturating_sub(1)..=(row + 1).min(GRID_SIZE - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(GRID_SIZE - 1) {
                if (r, c) != (row, col) {
                    out.push(r * GRID_SIZE + c);
                }
            }
        }
        out
    })
});

/// Neighbors of `pos` (which must be below 16).
pub fn neighbors(pos: usize) -> &'static [usize] {
    &NEIGHBORS[pos]
}

/// `true` if `a` and `b` are distinct touching cells.
pub fn are_adjacent(a: usize, b: usize) -> bool {
    a < CELL_COUNT && b < CELL_COUNT && neighbors(a).contains(&b)
}
