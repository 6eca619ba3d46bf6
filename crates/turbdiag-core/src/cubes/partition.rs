// crates/turbdiag-core/src/cubes/partition.rs

use std::ops::Range;

/// N x N x N equal cubes carved from the centred, cube-divisible part of a
/// cubic grid of edge `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubePartition {
    pub edge: usize,
    pub cubes_per_side: usize,
    /// floor(edge / cubes_per_side); zero when there are more cubes than cells.
    pub cube_dim: usize,
    /// First index of the cropped region on every axis.
    pub start: usize,
}

impl CubePartition {
    /// `cubes_per_side` must be non-zero.
    pub fn new(edge: usize, cubes_per_side: usize) -> Self {
        let cube_dim = edge / cubes_per_side;
        let cropped = cube_dim * cubes_per_side;
        // Odd leftovers leave the extra plane at the high end.
        let start = (edge - cropped) / 2;
        Self {
            edge,
            cubes_per_side,
            cube_dim,
            start,
        }
    }

    pub fn cropped_edge(&self) -> usize {
        self.cube_dim * self.cubes_per_side
    }

    /// `[start, end)` kept on every axis.
    pub fn crop_range(&self) -> Range<usize> {
        self.start..self.start + self.cropped_edge()
    }

    pub fn cube_count(&self) -> usize {
        self.cubes_per_side.pow(3)
    }

    /// Index range, in full-grid coordinates, of cube `c` along one axis.
    pub fn axis_range(&self, c: usize) -> Range<usize> {
        let lo = self.start + c * self.cube_dim;
        lo..lo + self.cube_dim
    }

    /// Flat position of cube (i, j, k) in row-major order.
    pub fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.cubes_per_side + j) * self.cubes_per_side + k
    }

    /// Cube indices in row-major order: i outermost, k innermost.
    pub fn cubes(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let n = self.cubes_per_side;
        (0..n).flat_map(move |i| (0..n).flat_map(move |j| (0..n).map(move |k| (i, j, k))))
    }
}
