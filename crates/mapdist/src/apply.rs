use crate::{
    Config, Error, MappedDistanceBuilder,
    aggregate::Aggregator,
    distribute::distribute_subproblems,
    executor::{Executor, TaskBatch},
    mapper::{MapperContext, SubproblemResult, compute_mapped_distance_on_subproblem},
};
use log::{info, trace};
use mapdist_nostd_internal::{Cutoff, GridSpec, SubproblemSize};
use ndarray::{Array2, ArrayView2};
use std::sync::Arc;

/// Drives a full calculation: distribute, dispatch, then aggregate results
/// as they complete.
pub(crate) fn compute_mapped_distances<F, E>(
    config: &Config,
    grid: &GridSpec,
    positions: ArrayView2<f64>,
    func: F,
    executor: &E,
) -> Result<Array2<f64>, Error>
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
    E: Executor,
{
    let n_points = positions.shape()[1];
    let weights = match config.weights() {
        Some(weights) => weights.to_vec(),
        None => vec![1.0; n_points],
    };

    // every configuration check happens before anything is dispatched
    let context = MapperContext::new(grid.clone(), config.cutoff(), config.exact_cutoff(), func)?;
    let (partition, subproblems) =
        distribute_subproblems(grid, positions, &weights, config.subproblem_size())?;
    info!(
        "mapping {} points onto {} grid cells with {} subproblems (cutoff = {})",
        n_points,
        grid.n_cells(),
        partition.n_subproblems,
        context.cutoff()
    );

    let context = executor.broadcast(context);
    let mut batch = executor.batch::<Result<SubproblemResult, Error>>();
    for subproblem in subproblems {
        let context = Arc::clone(&context);
        batch.submit(move || compute_mapped_distance_on_subproblem(subproblem, &context));
    }

    // we consume results as they arrive, so that aggregation overlaps with
    // the tasks that are still in flight
    let mut aggregator = Aggregator::new(grid.clone(), n_points);
    for (task_id, outcome) in batch.as_completed() {
        // the outer error comes from the backend, the inner one from the task
        let result = outcome??;
        trace!("task {} completed", task_id.get());
        aggregator.write(&result)?;
    }
    aggregator.finish()
}

/// Compute the mapped distance matrix between a uniform grid and a set of
/// non-uniform points.
///
/// For every grid point and every non-uniform point within the cutoff of one
/// another, `func` is applied to their distance and the result, scaled by the
/// point's weight, is stored in the output.
///
/// # Arguments
/// - `cell_size`, `cell_count`: the width and the number of cells of the
///   uniform grid along each axis. Along axis `d`, grid point `i` sits at
///   `i * cell_size[d]`.
/// - `cells_per_bin`: the number of grid cells in a bin along each axis
/// - `positions`: the non-uniform points, with shape
///   `(n_spatial_dims, n_points)`
/// - `cutoff`: the distance beyond which pairs are non-interacting
/// - `func`: maps a distance to a value
/// - `executor`: the backend used for running the subproblems
/// - `weights`: per-point weights (when `None`, every weight is 1)
/// - `exact_cutoff`: whether `func` is evaluated strictly within the cutoff
/// - `subproblem_size`: the maximum number of points per unit of work
///
/// # Output
/// An array with shape `(n_cells, n_points)`, where grid cells are flattened
/// in C order (the last axis changes fastest). Entries are zero where no
/// contribution was computed.
#[allow(clippy::too_many_arguments)]
pub fn mapped_distance_matrix<F, E>(
    cell_size: &[f64],
    cell_count: &[usize],
    cells_per_bin: &[usize],
    positions: ArrayView2<f64>,
    cutoff: Cutoff,
    func: F,
    executor: &E,
    weights: Option<&[f64]>,
    exact_cutoff: bool,
    subproblem_size: SubproblemSize,
) -> Result<Array2<f64>, Error>
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
    E: Executor,
{
    let grid = GridSpec::new(cell_size, cell_count, cells_per_bin).map_err(Error::geometry)?;
    let mut builder = MappedDistanceBuilder::new()
        .cutoff(cutoff)
        .exact_cutoff(exact_cutoff)
        .subproblem_size(subproblem_size);
    if let Some(weights) = weights {
        builder = builder.weights(weights.to_vec());
    }
    builder.build()?.compute(&grid, positions, func, executor)
}
