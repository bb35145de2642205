//! Computes the mapped distances for a single subproblem
//!
//! This is the only piece of the calculation that runs on the workers.

use crate::{Error, distribute::Subproblem};
use mapdist_nostd_internal::{Cutoff, GridPatch, GridSpec, squared_diff_norm};
use ndarray::{Array2, ArrayView2};

/// Everything (other than the subproblem itself) that a worker needs. It is
/// broadcast once and shared by every task.
pub struct MapperContext<F> {
    grid: GridSpec,
    // in the same units as the positions
    cutoff: f64,
    margin: Vec<usize>,
    exact_cutoff: bool,
    func: F,
}

impl<F: Fn(f64) -> f64> MapperContext<F> {
    pub fn new(
        grid: GridSpec,
        cutoff: Cutoff,
        exact_cutoff: bool,
        func: F,
    ) -> Result<Self, Error> {
        cutoff
            .validate()
            .map_err(|what| Error::cutoff(what, cutoff.value()))?;
        let cutoff = cutoff.to_native(&grid);
        let margin = grid.cell_margin(cutoff);
        Ok(Self {
            grid,
            cutoff,
            margin,
            exact_cutoff,
            func,
        })
    }

    /// the cutoff distance in the units of the positions
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// the patch of the grid that a subproblem in the bin at `bin_coord`
    /// considers
    pub fn patch_for_bin(&self, bin_coord: &[usize]) -> Result<GridPatch, Error> {
        GridPatch::for_bin(&self.grid, bin_coord, &self.margin).map_err(Error::inconsistent)
    }
}

/// The contribution of a single subproblem to the output.
///
/// `values` has the shape `(patch.n_cells(), point_indices.len())`. Entry
/// `[l, j]` belongs in the output at the row of the `l`th cell of `patch`
/// and the column given by `point_indices[j]`.
#[derive(Clone, Debug)]
pub struct SubproblemResult {
    subproblem: usize,
    patch: GridPatch,
    point_indices: Vec<usize>,
    values: Array2<f64>,
}

impl SubproblemResult {
    pub fn subproblem(&self) -> usize {
        self.subproblem
    }

    pub fn patch(&self) -> &GridPatch {
        &self.patch
    }

    pub fn point_indices(&self) -> &[usize] {
        &self.point_indices
    }

    pub fn values(&self) -> ArrayView2<f64> {
        self.values.view()
    }
}

/// Compute the mapped distance between every grid point in the patch of the
/// subproblem's bin and every point of the subproblem.
///
/// When `exact_cutoff` is enabled, the mapping function is only evaluated for
/// distances strictly smaller than the cutoff (other entries are left at 0).
/// Otherwise, it gets applied to every distance in the patch. Each mapped
/// value is scaled by the weight of its point.
///
/// The whole subproblem fails if a non-finite distance or mapped value is
/// encountered.
pub fn compute_mapped_distance_on_subproblem<F: Fn(f64) -> f64>(
    subproblem: Subproblem,
    context: &MapperContext<F>,
) -> Result<SubproblemResult, Error> {
    let patch = context.patch_for_bin(subproblem.bin_coord())?;
    let n_spatial_dims = context.grid.n_spatial_dims();
    let cell_size = context.grid.cell_size();
    let positions = subproblem.positions();
    let weights = subproblem.weights();

    let mut values = Array2::<f64>::zeros((patch.n_cells(), subproblem.n_points()));
    let mut cell_index = vec![0_usize; n_spatial_dims];
    let mut grid_pos = vec![0.0; n_spatial_dims];

    for (local_index, mut row) in values.rows_mut().into_iter().enumerate() {
        patch.global_cell_index(local_index, &mut cell_index);
        for axis in 0..n_spatial_dims {
            grid_pos[axis] = (cell_index[axis] as f64) * cell_size[axis];
        }

        for (j, out) in row.iter_mut().enumerate() {
            let distance = squared_diff_norm(&grid_pos, positions, j).sqrt();
            if !distance.is_finite() {
                return Err(Error::non_finite(
                    subproblem.id(),
                    subproblem.indices()[j],
                    distance,
                    f64::NAN,
                ));
            } else if context.exact_cutoff && distance >= context.cutoff {
                continue;
            }

            let mapped = (context.func)(distance);
            if !mapped.is_finite() {
                return Err(Error::non_finite(
                    subproblem.id(),
                    subproblem.indices()[j],
                    distance,
                    mapped,
                ));
            }
            *out = weights[j] * mapped;
        }
    }

    let id = subproblem.id();
    Ok(SubproblemResult {
        subproblem: id,
        patch,
        point_indices: subproblem.into_indices(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribute::distribute_subproblems;
    use mapdist_nostd_internal::SubproblemSize;

    fn single_subproblem(grid: &GridSpec, positions: &[f64], weights: &[f64]) -> Subproblem {
        let n_points = weights.len();
        let view = ArrayView2::from_shape((grid.n_spatial_dims(), n_points), positions).unwrap();
        let (_, mut subproblems) =
            distribute_subproblems(grid, view, weights, SubproblemSize::Unbounded).unwrap();
        assert_eq!(subproblems.len(), 1);
        subproblems.pop().unwrap()
    }

    #[test]
    fn exact_cutoff_masks_far_pairs() {
        // 1D grid: 10 cells of width 1, 5 cells per bin
        let grid = GridSpec::new(&[1.0], &[10], &[5]).unwrap();
        let subproblem = single_subproblem(&grid, &[2.0], &[1.0]);
        let context = MapperContext::new(grid, Cutoff::Cells(2.0), true, |d| 10.0 + d).unwrap();

        let result = compute_mapped_distance_on_subproblem(subproblem, &context).unwrap();
        // bin 0 spans cells [0, 5), widened by 2 cells -> [0, 7)
        assert_eq!(result.patch().start(), &[0]);
        assert_eq!(result.patch().stop(), &[7]);
        assert_eq!(result.point_indices(), &[0]);
        let values: Vec<f64> = result.values().column(0).to_vec();
        // grid points sit at 0, 1, ..., 6; only |x - 2| < 2 is evaluated
        assert_eq!(values, vec![0.0, 11.0, 10.0, 11.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn approximate_cutoff_maps_whole_patch() {
        let grid = GridSpec::new(&[1.0], &[10], &[5]).unwrap();
        let subproblem = single_subproblem(&grid, &[2.0], &[3.0]);
        let context = MapperContext::new(grid, Cutoff::Cells(2.0), false, |d| d).unwrap();

        let result = compute_mapped_distance_on_subproblem(subproblem, &context).unwrap();
        let values: Vec<f64> = result.values().column(0).to_vec();
        // weights scale the mapped value
        assert_eq!(values, vec![6.0, 3.0, 0.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn two_dimensional_distances() {
        // 6 x 4 cells, cell width 0.5 x 1.0; a single bin
        let grid = GridSpec::new(&[0.5, 1.0], &[6, 4], &[6, 4]).unwrap();
        #[rustfmt::skip]
        let positions = [
            1.0, 0.0,
            1.0, 3.0,
        ];
        let subproblem = single_subproblem(&grid, &positions, &[1.0, 2.0]);
        let context =
            MapperContext::new(grid.clone(), Cutoff::Native(10.0), true, |d| d * d).unwrap();
        let result = compute_mapped_distance_on_subproblem(subproblem, &context).unwrap();
        assert_eq!(result.patch().n_cells(), 24);

        let mut cell_index = [0_usize; 2];
        for local in 0..24 {
            result.patch().global_cell_index(local, &mut cell_index);
            let x = cell_index[0] as f64 * 0.5;
            let y = cell_index[1] as f64;
            let expected_0 = (x - 1.0).powi(2) + (y - 1.0).powi(2);
            let expected_1 = 2.0 * ((x - 0.0).powi(2) + (y - 3.0).powi(2));
            let row = result.values().row(local).to_vec();
            let column_of = |point: usize| {
                result
                    .point_indices()
                    .iter()
                    .position(|&p| p == point)
                    .unwrap()
            };
            assert!((row[column_of(0)] - expected_0).abs() < 1e-12);
            assert!((row[column_of(1)] - expected_1).abs() < 1e-12);
        }
    }

    #[test]
    fn non_finite_values_fail() {
        let grid = GridSpec::new(&[1.0], &[10], &[5]).unwrap();
        let subproblem = single_subproblem(&grid, &[2.0], &[1.0]);
        let context = MapperContext::new(grid, Cutoff::Cells(2.0), false, |d| 1.0 / d).unwrap();
        // the grid point at x = 2 sits on top of the point
        let err = compute_mapped_distance_on_subproblem(subproblem, &context).unwrap_err();
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn invalid_cutoff() {
        let grid = GridSpec::new(&[1.0], &[10], &[5]).unwrap();
        assert!(MapperContext::new(grid.clone(), Cutoff::Cells(0.0), true, |d| d).is_err());
        assert!(MapperContext::new(grid, Cutoff::Native(f64::NAN), true, |d| d).is_err());
    }

    #[test]
    fn patch_outside_grid_is_not_a_configuration_error() {
        let grid = GridSpec::new(&[1.0], &[10], &[5]).unwrap();
        let context = MapperContext::new(grid, Cutoff::Cells(2.0), true, |d| d).unwrap();
        assert!(context.patch_for_bin(&[0]).is_ok());
        // the grid only has 2 bins
        let err = context.patch_for_bin(&[2]).unwrap_err();
        assert!(!err.is_configuration_error());
    }
}
