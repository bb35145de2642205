use alloc::vec::Vec;
use core::num::NonZeroUsize;

/// Specifies the maximum number of points in a subproblem
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubproblemSize {
    /// Each bin is split into subproblems holding no more than this many
    /// points
    Bounded(NonZeroUsize),
    /// Each non-empty bin becomes a single subproblem
    Unbounded,
}

/// the number of points per subproblem used when nothing else is specified
pub const DEFAULT_POINTS_PER_SUBPROBLEM: NonZeroUsize = NonZeroUsize::new(5).unwrap();

impl Default for SubproblemSize {
    fn default() -> Self {
        SubproblemSize::Bounded(DEFAULT_POINTS_PER_SUBPROBLEM)
    }
}

/// Split the point indices of each bin into subproblems.
///
/// `bins` holds a list of point indices for each non-empty bin. Each entry
/// of the returned vector is a `(bin_position, indices)` pair, where
/// `bin_position` is the position of the source bin within `bins`.
///
/// With [`SubproblemSize::Bounded`], a bin holding `n` indices is split into
/// `ceil(n/k)` contiguous chunks whose lengths differ by no more than 1.
pub fn extract_subproblems(
    bins: Vec<Vec<usize>>,
    size: SubproblemSize,
) -> Vec<(usize, Vec<usize>)> {
    let mut out = Vec::new();
    for (bin_position, indices) in bins.into_iter().enumerate() {
        if indices.is_empty() {
            continue;
        }
        match size {
            SubproblemSize::Unbounded => out.push((bin_position, indices)),
            SubproblemSize::Bounded(k) => {
                let n = indices.len();
                let n_chunks = n.div_ceil(k.get());
                // the first `n_long` chunks hold an extra element
                let base_len = n / n_chunks;
                let n_long = n % n_chunks;
                let mut offset = 0;
                for chunk_idx in 0..n_chunks {
                    let len = base_len + usize::from(chunk_idx < n_long);
                    out.push((bin_position, indices[offset..offset + len].to_vec()));
                    offset += len;
                }
            }
        }
    }
    out
}
