//! Assembles the per-subproblem results into the global output
//!
//! The aggregator is the only thing that ever mutates the output array, and
//! it lives on the orchestrating thread. Subproblems partition the points, so
//! no two results ever address the same (grid-cell, point) pair and results
//! can be written in whatever order they arrive.

use crate::{Error, mapper::SubproblemResult};
use log::trace;
use mapdist_nostd_internal::GridSpec;
use ndarray::Array2;

pub struct Aggregator {
    grid: GridSpec,
    // shape is (n_cells, n_points)
    output: Array2<f64>,
    // tracks which points already received a result
    visited: Vec<bool>,
    n_results: usize,
}

impl Aggregator {
    /// create an aggregator whose output is initialized to zero
    pub fn new(grid: GridSpec, n_points: usize) -> Self {
        let output = Array2::<f64>::zeros((grid.n_cells(), n_points));
        Aggregator {
            grid,
            output,
            visited: vec![false; n_points],
            n_results: 0,
        }
    }

    /// the number of results written so far
    pub fn n_results(&self) -> usize {
        self.n_results
    }

    /// Write a subproblem's values into its slice of the output.
    ///
    /// Fails (without touching the output) if the result addresses a point
    /// that already received a result, or if it is malformed.
    pub fn write(&mut self, result: &SubproblemResult) -> Result<(), Error> {
        let patch = result.patch();
        let point_indices = result.point_indices();
        let values = result.values();
        let n_points = self.visited.len();

        if values.dim() != (patch.n_cells(), point_indices.len()) {
            return Err(Error::malformed_result(
                result.subproblem(),
                "its values don't match its patch & points",
            ));
        }
        for &p in point_indices {
            if p >= n_points {
                return Err(Error::malformed_result(
                    result.subproblem(),
                    "it refers to a nonexistent point",
                ));
            } else if self.visited[p] {
                return Err(Error::incomplete(0, 1));
            }
        }
        for &p in point_indices {
            self.visited[p] = true;
        }

        let mut cell_index = vec![0_usize; self.grid.n_spatial_dims()];
        for (local_index, row) in values.rows().into_iter().enumerate() {
            patch.global_cell_index(local_index, &mut cell_index);
            let flat_index = self.grid.flat_cell_index(&cell_index);
            for (&p, &value) in point_indices.iter().zip(row.iter()) {
                self.output[[flat_index, p]] = value;
            }
        }
        self.n_results += 1;
        trace!(
            "wrote subproblem {} ({} cells x {} points)",
            result.subproblem(),
            patch.n_cells(),
            point_indices.len()
        );
        Ok(())
    }

    /// Consume the aggregator and return the output, with the shape
    /// `(n_cells, n_points)`.
    ///
    /// Fails if some point never received a result. Leaving those columns at
    /// zero would be indistinguishable from a genuine result of zero.
    pub fn finish(self) -> Result<Array2<f64>, Error> {
        let n_missing = self.visited.iter().filter(|v| !**v).count();
        if n_missing > 0 {
            Err(Error::incomplete(n_missing, 0))
        } else {
            Ok(self.output)
        }
    }
}
