//! Configuration of a mapped distance calculation
//!
//! A [`Config`] is built with [`MappedDistanceBuilder`]. Everything that can
//! be checked without the point set is validated during `build`, the rest is
//! checked before any work gets dispatched.

use crate::{Error, apply::compute_mapped_distances, executor::Executor};
use mapdist_nostd_internal::{Cutoff, GridSpec, SubproblemSize};
use ndarray::{Array2, ArrayView2};

/// A validated description of a mapped distance calculation.
///
/// This is the "single source of truth" for the calculation properties (other
/// than the grid, the points and the mapping function).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    cutoff: Cutoff,
    exact_cutoff: bool,
    subproblem_size: SubproblemSize,
    weights: Option<Vec<f64>>,
}

impl Config {
    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn exact_cutoff(&self) -> bool {
        self.exact_cutoff
    }

    pub fn subproblem_size(&self) -> SubproblemSize {
        self.subproblem_size
    }

    /// the per-point weights (`None` means every weight is 1)
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Compute the mapped distance matrix of `positions` (with shape
    /// `(n_spatial_dims, n_points)`) on `grid`.
    ///
    /// The result has the shape `(grid.n_cells(), n_points)`.
    pub fn compute<F, E>(
        &self,
        grid: &GridSpec,
        positions: ArrayView2<f64>,
        func: F,
        executor: &E,
    ) -> Result<Array2<f64>, Error>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        E: Executor,
    {
        compute_mapped_distances(self, grid, positions, func, executor)
    }
}

/// Builds a [`Config`]
///
/// The cutoff is the only required setting. By default, the cutoff is exact,
/// every weight is 1 and subproblems hold at most 5 points.
#[derive(Clone, Debug, Default)]
pub struct MappedDistanceBuilder {
    cutoff: Option<Cutoff>,
    exact_cutoff: Option<bool>,
    subproblem_size: SubproblemSize,
    weights: Option<Vec<f64>>,
}

impl MappedDistanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: Cutoff) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// When `true` (the default), the mapping function is only evaluated for
    /// distances within the cutoff. When `false`, it gets evaluated for every
    /// grid point in the vicinity of a point's bin, which is cheaper per
    /// element but may include pairs beyond the cutoff.
    pub fn exact_cutoff(mut self, exact_cutoff: bool) -> Self {
        self.exact_cutoff = Some(exact_cutoff);
        self
    }

    pub fn subproblem_size(mut self, subproblem_size: SubproblemSize) -> Self {
        self.subproblem_size = subproblem_size;
        self
    }

    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn build(&self) -> Result<Config, Error> {
        let cutoff = self.cutoff.ok_or_else(Error::cutoff_presence)?;
        cutoff
            .validate()
            .map_err(|what| Error::cutoff(what, cutoff.value()))?;
        if let Some(weights) = &self.weights {
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(Error::geometry("every weight must be finite"));
            }
        }
        Ok(Config {
            cutoff,
            exact_cutoff: self.exact_cutoff.unwrap_or(true),
            subproblem_size: self.subproblem_size,
            weights: self.weights.clone(),
        })
    }
}
