//! Describes the uniform grid and the coarser partition of it into bins.
//!
//! The uniform grid is axis-aligned. Along axis `d`, grid point `i` sits at
//! `i * cell_size[d]`. Bins group together `cells_per_bin[d]` cells along
//! each axis; the last bin along an axis also absorbs any leftover cells (so
//! every cell belongs to exactly one bin).

use crate::misc::ceil_to_usize;
use alloc::vec::Vec;
use ndarray::{Array2, ArrayView2};

/// The radius beyond which a grid-point/point pair is treated as
/// non-interacting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cutoff {
    /// A cutoff measured in grid cells. It gets converted to native units
    /// with the smallest cell width, so that the cutoff never reaches more
    /// than this many cells along any axis.
    Cells(f64),
    /// A cutoff measured in the same units as the positions
    Native(f64),
}

impl Cutoff {
    /// the raw value (in whatever units the variant uses)
    pub fn value(&self) -> f64 {
        match self {
            Cutoff::Cells(v) | Cutoff::Native(v) => *v,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let v = self.value();
        if !v.is_finite() {
            Err("the cutoff distance must be finite")
        } else if v <= 0.0 {
            Err("the cutoff distance must be positive")
        } else {
            Ok(())
        }
    }

    /// convert the cutoff to the units of the positions
    pub fn to_native(&self, grid: &GridSpec) -> f64 {
        match self {
            Cutoff::Cells(n_cells) => n_cells * grid.min_cell_size(),
            Cutoff::Native(r) => *r,
        }
    }
}

/// Pre-validated description of the uniform grid and its bins
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    cell_size: Vec<f64>,
    cell_count: Vec<usize>,
    cells_per_bin: Vec<usize>,
    bins_per_axis: Vec<usize>,
}

impl GridSpec {
    pub fn new(
        cell_size: &[f64],
        cell_count: &[usize],
        cells_per_bin: &[usize],
    ) -> Result<GridSpec, &'static str> {
        let n_dims = cell_size.len();
        if n_dims == 0 {
            Err("the grid must have at least 1 spatial dimension")
        } else if cell_count.len() != n_dims || cells_per_bin.len() != n_dims {
            Err("cell_size, cell_count & cells_per_bin must all have the same length")
        } else if cell_size.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            Err("each cell size must be positive and finite")
        } else if cell_count.contains(&0) {
            Err("each cell count must be positive")
        } else if cells_per_bin.contains(&0) {
            Err("each bin must hold at least 1 cell along every axis")
        } else if cells_per_bin
            .iter()
            .zip(cell_count.iter())
            .any(|(per_bin, count)| per_bin > count)
        {
            Err("a bin can't hold more cells than the grid along any axis")
        } else {
            let bins_per_axis = cell_count
                .iter()
                .zip(cells_per_bin.iter())
                .map(|(count, per_bin)| count / per_bin)
                .collect();
            Ok(Self {
                cell_size: cell_size.to_vec(),
                cell_count: cell_count.to_vec(),
                cells_per_bin: cells_per_bin.to_vec(),
                bins_per_axis,
            })
        }
    }

    pub fn n_spatial_dims(&self) -> usize {
        self.cell_size.len()
    }

    pub fn cell_size(&self) -> &[f64] {
        &self.cell_size
    }

    pub fn cell_count(&self) -> &[usize] {
        &self.cell_count
    }

    pub fn cells_per_bin(&self) -> &[usize] {
        &self.cells_per_bin
    }

    pub fn bins_per_axis(&self) -> &[usize] {
        &self.bins_per_axis
    }

    /// total number of cells in the grid
    pub fn n_cells(&self) -> usize {
        self.cell_count.iter().product()
    }

    /// total number of bins
    pub fn n_bins(&self) -> usize {
        self.bins_per_axis.iter().product()
    }

    pub fn min_cell_size(&self) -> f64 {
        self.cell_size.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// The range of cell indices, `[start, stop)`, covered by bin `bin` along
    /// `axis`. The last bin extends to the edge of the grid.
    pub fn bin_cell_range(&self, axis: usize, bin: usize) -> (usize, usize) {
        let start = bin * self.cells_per_bin[axis];
        let stop = if bin + 1 >= self.bins_per_axis[axis] {
            self.cell_count[axis]
        } else {
            start + self.cells_per_bin[axis]
        };
        (start, stop)
    }

    /// The number of extra cells we need on either side of a bin (along
    /// each axis) to enclose every grid point within `radius` of a point
    /// inside the bin.
    pub fn cell_margin(&self, radius: f64) -> Vec<usize> {
        self.cell_size
            .iter()
            .map(|h| ceil_to_usize(radius / h))
            .collect()
    }

    /// Compute the bin coordinate along `axis` of a position.
    ///
    /// Positions that lie outside of the grid get clamped into the nearest
    /// boundary bin (they are never dropped).
    pub fn bin_coord_1d(&self, axis: usize, pos: f64) -> usize {
        let bin_width = self.cell_size[axis] * (self.cells_per_bin[axis] as f64);
        let quotient = pos / bin_width;
        let last_bin = self.bins_per_axis[axis] - 1;
        if quotient <= 0.0 {
            // this also covers -0.0
            0
        } else {
            // the cast truncates (equivalent to floor for positive values)
            // and saturates for huge values
            (quotient as usize).min(last_bin)
        }
    }

    /// Compute the bin coordinate of every point.
    ///
    /// `positions` has the shape `(n_spatial_dims, n_points)`. The result has
    /// the shape `(n_points, n_spatial_dims)`.
    pub fn compute_bin_coords(
        &self,
        positions: ArrayView2<f64>,
    ) -> Result<Array2<usize>, &'static str> {
        if positions.shape()[0] != self.n_spatial_dims() {
            return Err("positions must have the same number of spatial dimensions as the grid");
        }
        let n_points = positions.shape()[1];
        let mut out = Array2::<usize>::zeros((n_points, self.n_spatial_dims()));
        for ((i, axis), coord) in out.indexed_iter_mut() {
            *coord = self.bin_coord_1d(axis, positions[[axis, i]]);
        }
        Ok(out)
    }

    /// flatten a global cell index (last axis fastest)
    pub fn flat_cell_index(&self, cell_index: &[usize]) -> usize {
        let mut flat = 0;
        for (idx, count) in cell_index.iter().zip(self.cell_count.iter()) {
            flat = flat * count + idx;
        }
        flat
    }
}
