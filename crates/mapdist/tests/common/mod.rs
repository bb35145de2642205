// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

#![allow(dead_code)]

use ndarray::Array2;
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

/// panics with a useful message at the first pair of elements that differ
pub fn assert_allclose(actual: &Array2<f64>, expected: &Array2<f64>, rtol: f64, atol: f64) {
    assert_eq!(actual.shape(), expected.shape(), "the shapes differ");
    for ((idx, a), e) in actual.indexed_iter().zip(expected.iter()) {
        assert!(
            isclose(*a, *e, rtol, atol),
            "mismatch at [{}, {}]: actual = {}, expected = {}",
            idx.0,
            idx.1,
            a,
            e
        );
    }
}

/// Computes the mapped distance matrix by visiting every (grid-point, point)
/// pair. The mapping function is only applied where the distance is strictly
/// smaller than `cutoff` (in the units of the positions).
pub fn brute_force_mapped_distances(
    cell_size: &[f64],
    cell_count: &[usize],
    positions: &Array2<f64>,
    weights: &[f64],
    cutoff: f64,
    func: impl Fn(f64) -> f64,
) -> Array2<f64> {
    let n_dims = cell_size.len();
    let n_cells: usize = cell_count.iter().product();
    let n_points = positions.shape()[1];
    let mut out = Array2::<f64>::zeros((n_cells, n_points));

    let mut cell_index = vec![0_usize; n_dims];
    for flat in 0..n_cells {
        // delinearize (last axis fastest)
        let mut remainder = flat;
        for axis in (0..n_dims).rev() {
            cell_index[axis] = remainder % cell_count[axis];
            remainder /= cell_count[axis];
        }
        for p in 0..n_points {
            let mut dist_sqr = 0.0;
            for axis in 0..n_dims {
                let diff = (cell_index[axis] as f64) * cell_size[axis] - positions[[axis, p]];
                dist_sqr += diff * diff;
            }
            let distance = dist_sqr.sqrt();
            if distance < cutoff {
                out[[flat, p]] = weights[p] * func(distance);
            }
        }
    }
    out
}

/// Draws `n_points` uniformly distributed positions within the box spanned by
/// `lower` and `upper`. The result has shape `(n_spatial_dims, n_points)`.
pub fn random_positions(seed: u64, n_points: usize, lower: &[f64], upper: &[f64]) -> Array2<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let n_dims = lower.len();
    let mut out = Array2::<f64>::zeros((n_dims, n_points));
    for axis in 0..n_dims {
        let dist = Uniform::new(lower[axis], upper[axis]).unwrap();
        for p in 0..n_points {
            out[[axis, p]] = dist.sample(&mut rng);
        }
    }
    out
}

/// Draws `n` weights from `[0.5, 2.0)`
pub fn random_weights(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::new(0.5, 2.0).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

pub fn gaussian(d: f64) -> f64 {
    (-d * d).exp()
}
