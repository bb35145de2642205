/*!
Computes "mapped distance matrices" between a uniform grid and a set of
scattered (non-uniform) points.

# High-Level: Mapped Distance Matrices

For every cell of a uniform grid and every non-uniform point within a cutoff
radius of it, we evaluate a user-supplied function of their distance. The
results are stored in a dense array with a row per grid cell and a column
per point.

A brute-force all-pairs calculation quickly becomes infeasible. Instead we:
1. partition the grid into coarse bins and assign each point to a bin
   (points outside of the grid are absorbed by the boundary bins)
2. split crowded bins into bounded subproblems
3. hand each subproblem to an [`Executor`], which only considers the patch
   of the grid in the vicinity of the subproblem's bin
4. write each result into the output as soon as it arrives

# User Guide

The quickest way to get started is [`mapped_distance_matrix`]. For more
control, build a [`Config`] with [`MappedDistanceBuilder`] and call
[`Config::compute`].

```
use mapdist::{Cutoff, MappedDistanceBuilder, GridSpec, SerialExecutor};
use ndarray::ArrayView2;

// a 16 x 16 grid of cells with width 0.125, and bins of 4 x 4 cells
let grid = GridSpec::new(&[0.125, 0.125], &[16, 16], &[4, 4]).unwrap();

// 3 points, the spatial dimension varies along axis 0
let positions = [0.3, 1.1, 1.9, 0.2, 0.8, 1.0];
let positions = ArrayView2::from_shape((2, 3), &positions).unwrap();

let config = MappedDistanceBuilder::new()
    .cutoff(Cutoff::Cells(3.0))
    .build()
    .unwrap();
let out = config
    .compute(&grid, positions, |d| (-d * d).exp(), &SerialExecutor)
    .unwrap();
assert_eq!(out.shape(), &[256, 3]);
```

# Developer Guide

The purely geometric machinery (grouping, linearization, subproblem
extraction, grid patches) lives in `mapdist_nostd_internal`.

*/

#![deny(rustdoc::broken_intra_doc_links)]

mod aggregate;
mod apply;
mod config;
mod distribute;
mod error;
mod executor;
mod mapper;
mod parallel_rayon;
mod parallel_serial;

// the public API
pub use aggregate::Aggregator;
pub use apply::mapped_distance_matrix;
pub use config::{Config, MappedDistanceBuilder};
pub use distribute::{Partition, Subproblem, distribute_subproblems};
pub use error::Error;
pub use executor::{AsCompleted, Executor, TaskBatch, TaskId};
pub use mapdist_nostd_internal::{
    Cutoff, DEFAULT_POINTS_PER_SUBPROBLEM, GridPatch, GridSpec, SubproblemSize,
    extract_subproblems, group_by, linearize_bin_coords,
};
pub use mapper::{MapperContext, SubproblemResult, compute_mapped_distance_on_subproblem};
pub use parallel_rayon::{RayonBatch, RayonExecutor};
pub use parallel_serial::{SerialBatch, SerialExecutor};
