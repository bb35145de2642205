//! Maps N-dimensional bin coordinates onto a single integer index.
//!
//! Linear indices are assigned in C-like order (the last axis changes
//! fastest). They are only ever used as grouping keys.

use alloc::vec::Vec;
use ndarray::ArrayView2;

/// Compute the per-axis multipliers used for linearization.
///
/// The multiplier of axis `i` is the product of `bins_per_axis[j]` for all
/// `j > i` (the multiplier of the last axis is always 1).
pub fn bin_strides(bins_per_axis: &[usize]) -> Vec<usize> {
    let mut strides = alloc::vec![1_usize; bins_per_axis.len()];
    for i in (0..bins_per_axis.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * bins_per_axis[i + 1];
    }
    strides
}

/// Linearize each row of `bin_coords`.
///
/// `bin_coords` has shape `(n_coords, n_spatial_dims)`, each row is a single
/// bin coordinate. For example, when `bins_per_axis` is `[1, 3, 2]`, the
/// coordinates `[0, 1, 1]`, `[1, 1, 1]`, `[0, 0, 1]` & `[1, 2, 0]` map to
/// `3`, `9`, `1` & `10`.
pub fn linearize_bin_coords(
    bins_per_axis: &[usize],
    bin_coords: ArrayView2<usize>,
) -> Result<Vec<usize>, &'static str> {
    if bin_coords.shape()[1] != bins_per_axis.len() {
        return Err("bin_coords must have a column for every entry of bins_per_axis");
    }
    let strides = bin_strides(bins_per_axis);
    Ok(bin_coords
        .rows()
        .into_iter()
        .map(|row| row.iter().zip(strides.iter()).map(|(c, s)| c * s).sum())
        .collect())
}
