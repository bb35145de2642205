use crate::geometry::GridSpec;
use alloc::vec::Vec;

/// A rectangular block of the uniform grid, given by the per-axis global cell
/// ranges `[start, stop)`.
///
/// A subproblem only ever considers the grid points inside of the patch
/// associated with its bin. Local cells are enumerated in C order (the last
/// axis changes fastest), matching the order of the global output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPatch {
    start: Vec<usize>,
    stop: Vec<usize>,
}

impl GridPatch {
    /// Build the patch enclosing every grid point that could lie within the
    /// cutoff of a point assigned to the bin at `bin_coord`.
    ///
    /// `margin` holds the number of cells (per axis) spanned by the cutoff.
    /// It's usually computed with [`GridSpec::cell_margin`].
    pub fn for_bin(
        grid: &GridSpec,
        bin_coord: &[usize],
        margin: &[usize],
    ) -> Result<GridPatch, &'static str> {
        let n_dims = grid.n_spatial_dims();
        if bin_coord.len() != n_dims || margin.len() != n_dims {
            return Err("bin_coord & margin must have an entry for each spatial dimension");
        } else if bin_coord
            .iter()
            .zip(grid.bins_per_axis().iter())
            .any(|(coord, n_bins)| coord >= n_bins)
        {
            return Err("bin_coord lies outside of the grid");
        }

        let mut start = Vec::with_capacity(n_dims);
        let mut stop = Vec::with_capacity(n_dims);
        for axis in 0..n_dims {
            let (bin_start, bin_stop) = grid.bin_cell_range(axis, bin_coord[axis]);
            start.push(bin_start.saturating_sub(margin[axis]));
            stop.push(
                bin_stop
                    .saturating_add(margin[axis])
                    .min(grid.cell_count()[axis]),
            );
        }
        Ok(GridPatch { start, stop })
    }

    pub fn start(&self) -> &[usize] {
        &self.start
    }

    pub fn stop(&self) -> &[usize] {
        &self.stop
    }

    /// number of grid cells in the patch
    pub fn n_cells(&self) -> usize {
        self.start
            .iter()
            .zip(self.stop.iter())
            .map(|(a, b)| b - a)
            .product()
    }

    /// Write the global (multi-dimensional) cell index of the `local_index`th
    /// cell of the patch into `out`.
    pub fn global_cell_index(&self, local_index: usize, out: &mut [usize]) {
        let mut remainder = local_index;
        for axis in (0..self.start.len()).rev() {
            let len = self.stop[axis] - self.start[axis];
            out[axis] = self.start[axis] + remainder % len;
            remainder /= len;
        }
    }
}
