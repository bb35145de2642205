/// calculate the squared norm of the difference between a grid position and
/// the `i`th (mathematical) vector held in `positions`, which has the
/// spatial dimension along the "slow axis"
///
/// # Note
/// This is only public so that it can be used in other crates (it isn't meant
/// to be exposed outside of the package)
pub fn squared_diff_norm(grid_pos: &[f64], positions: ndarray::ArrayView2<f64>, i: usize) -> f64 {
    let mut sum = 0.0;
    for (k, x) in grid_pos.iter().enumerate() {
        let diff = x - positions[[k, i]];
        sum += diff * diff; // NOTE: .powi can't be used in no_std crates
    }
    sum
}

/// the smallest integer that is no smaller than `val`
///
/// `val` must be finite and non-negative.
///
/// # Note
/// `f64::ceil` isn't available in no_std crates
pub fn ceil_to_usize(val: f64) -> usize {
    // `as` saturates, so huge values are capped at usize::MAX
    let truncated = val as usize;
    if (truncated as f64) < val {
        truncated.saturating_add(1)
    } else {
        truncated
    }
}
