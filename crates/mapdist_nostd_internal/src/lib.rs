//! Geometric partitioning machinery used by the `mapdist` crate.
//!
//! Everything in here is pure bookkeeping: grouping point indices by bin,
//! linearizing bin coordinates, cutting bins into bounded subproblems, and
//! describing the patch of the uniform grid that a bin can interact with.
//! None of it touches the user-supplied mapping function or the execution
//! backend.
//!
//! We stick to `no_std` (with `alloc`) so this logic can be shared with
//! backends that can't rely on the standard library.

#![no_std]
extern crate alloc;

mod geometry;
mod group;
mod linearize;
mod misc;
mod patch;
mod subproblem;

pub use geometry::{Cutoff, GridSpec};
pub use group::group_by;
pub use linearize::{bin_strides, linearize_bin_coords};
pub use misc::{ceil_to_usize, squared_diff_norm};
pub use patch::GridPatch;
pub use subproblem::{DEFAULT_POINTS_PER_SUBPROBLEM, SubproblemSize, extract_subproblems};
