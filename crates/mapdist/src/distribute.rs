//! Splits a set of non-uniform points into subproblems
//!
//! This is purely geometric partitioning, no distances get computed here.
//! The steps are:
//! 1. compute the (clamped) bin coordinate of every point
//! 2. linearize the bin coordinates and group the point indices by bin
//! 3. cut each bin into one or more bounded subproblems
//! 4. package each subproblem with everything a worker needs
//!
//! Every point ends up in exactly one subproblem.

use crate::Error;
use log::debug;
use mapdist_nostd_internal::{
    GridSpec, SubproblemSize, extract_subproblems, group_by, linearize_bin_coords,
};
use ndarray::{Array2, ArrayView2, Axis};

/// A unit of work: a bounded chunk of the points that belong to a single bin.
///
/// Instances are immutable once they are created.
#[derive(Clone, Debug)]
pub struct Subproblem {
    id: usize,
    bin_coord: Vec<usize>,
    indices: Vec<usize>,
    // shape is (n_spatial_dims, n_points)
    positions: Array2<f64>,
    weights: Vec<f64>,
}

impl Subproblem {
    /// position of the subproblem in the sequence produced by
    /// [`distribute_subproblems`]
    pub fn id(&self) -> usize {
        self.id
    }

    /// coordinate of the bin holding every point in the subproblem
    pub fn bin_coord(&self) -> &[usize] {
        &self.bin_coord
    }

    /// indices of the subproblem's points within the full point set
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// the subproblem's positions, with shape `(n_spatial_dims, n_points)`
    pub fn positions(&self) -> ArrayView2<f64> {
        self.positions.view()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn n_points(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

/// Summarizes how the points were partitioned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub n_points: usize,
    pub n_bins: usize,
    pub n_occupied_bins: usize,
    pub n_subproblems: usize,
    pub largest_subproblem: usize,
}

/// Check that `positions` & `weights` are consistent with `grid`
fn validate_points(
    grid: &GridSpec,
    positions: ArrayView2<f64>,
    weights: &[f64],
) -> Result<(), Error> {
    let n_points = positions.shape()[1];
    if positions.shape()[0] != grid.n_spatial_dims() {
        Err(Error::shape(
            "the spatial axis of positions",
            grid.n_spatial_dims(),
            positions.shape()[0],
        ))
    } else if weights.len() != n_points {
        Err(Error::shape("weights", n_points, weights.len()))
    } else if positions.iter().any(|x| !x.is_finite()) {
        Err(Error::geometry("every position must be finite"))
    } else {
        Ok(())
    }
}

/// Assign every point to a bin and split the bins into subproblems.
///
/// `positions` has the shape `(n_spatial_dims, n_points)` and `weights` holds
/// a weight for each point. Points that lie outside of the grid are assigned
/// to the nearest boundary bin.
pub fn distribute_subproblems(
    grid: &GridSpec,
    positions: ArrayView2<f64>,
    weights: &[f64],
    subproblem_size: SubproblemSize,
) -> Result<(Partition, Vec<Subproblem>), Error> {
    validate_points(grid, positions, weights)?;
    let n_points = positions.shape()[1];

    let bin_coords = grid
        .compute_bin_coords(positions)
        .map_err(Error::internal_legacy_adhoc)?;
    let linear_bin_indices = linearize_bin_coords(grid.bins_per_axis(), bin_coords.view())
        .map_err(Error::internal_legacy_adhoc)?;
    // clamping keeps every coordinate inside the bins
    debug_assert!(linear_bin_indices.iter().all(|i| *i < grid.n_bins()));

    // we pair each linear bin index with the index of its point, so that
    // grouping produces the list of point indices held by each bin
    let pairs: Vec<(usize, usize)> = linear_bin_indices.into_iter().zip(0..n_points).collect();
    let indices_inside_bins = group_by(&pairs);
    let n_occupied_bins = indices_inside_bins.len();

    let chunks = extract_subproblems(indices_inside_bins, subproblem_size);

    let subproblems: Vec<Subproblem> = chunks
        .into_iter()
        .enumerate()
        .map(|(id, (_, indices))| {
            // every index in a chunk shares a bin, so the first is as good as
            // any other
            let bin_coord = bin_coords.row(indices[0]).to_vec();
            Subproblem {
                id,
                bin_coord,
                positions: positions.select(Axis(1), &indices),
                weights: indices.iter().map(|&i| weights[i]).collect(),
                indices,
            }
        })
        .collect();

    let partition = Partition {
        n_points,
        n_bins: grid.n_bins(),
        n_occupied_bins,
        n_subproblems: subproblems.len(),
        largest_subproblem: subproblems.iter().map(Subproblem::n_points).max().unwrap_or(0),
    };
    debug!(
        "partitioned {} points: {} of {} bins are occupied, {} subproblems \
         (largest holds {} points)",
        partition.n_points,
        partition.n_occupied_bins,
        partition.n_bins,
        partition.n_subproblems,
        partition.largest_subproblem
    );
    Ok((partition, subproblems))
}
