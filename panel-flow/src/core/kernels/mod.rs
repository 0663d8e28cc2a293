//! Closed-form singular kernels
//!
//! Velocity and potential of unit-strength singularity elements, evaluated
//! at arbitrary target points:
//!
//! - [`filament`] - finite and semi-infinite vortex filaments: panel vortex
//!   rings and trailing-edge horseshoes
//! - [`sheet`] - constant-strength uniform vortex sheets (edge-contour
//!   logarithms plus the signed solid angle)
//! - [`doublet`] - constant-strength doublet-panel and semi-infinite
//!   wake-strip potentials (signed solid angles)
//!
//! All kernels share two regularization controls: `offset` is folded into
//! denominators as `sqrt(r² + offset²)` so near-singular geometry stays
//! finite, and `cutoff` is the minimum evaluated distance below which a
//! contribution is skipped entirely. Kernels stream over targets and
//! accumulate `+=` into caller-provided buffers; they never allocate.

pub mod doublet;
pub mod filament;
pub mod sheet;

pub use doublet::{potential_doublet_panel, potential_doublet_wake_strip};
pub use filament::{induced_horseshoe, induced_vortex_ring};
pub use sheet::induced_vortex_sheet;

use ndarray::{Array1, Array2};

/// Accumulation target for the velocity kernels
///
/// Either the full induced velocity, accumulated into an `(ntargets, 3)`
/// array, or its projection onto a per-target unit vector (typically the
/// collocation normal), accumulated into a length-`ntargets` vector. The
/// projected form is what influence-matrix assembly consumes.
pub enum KernelOutput<'a> {
    /// Full 3-component induced velocity
    Velocity(&'a mut Array2<f64>),
    /// Scalar projection onto per-target unit vectors
    Projected {
        /// Accumulator, one scalar per target
        out: &'a mut Array1<f64>,
        /// Per-target unit vectors, `(ntargets, 3)`
        directions: &'a Array2<f64>,
    },
}

impl KernelOutput<'_> {
    /// Number of targets this output accepts
    pub fn len(&self) -> usize {
        match self {
            KernelOutput::Velocity(out) => out.nrows(),
            KernelOutput::Projected { out, .. } => out.len(),
        }
    }

    /// True when there are no targets
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accumulate the velocity `v` for target `i`
    #[inline]
    pub(crate) fn accumulate(&mut self, i: usize, v: [f64; 3]) {
        match self {
            KernelOutput::Velocity(out) => {
                out[[i, 0]] += v[0];
                out[[i, 1]] += v[1];
                out[[i, 2]] += v[2];
            }
            KernelOutput::Projected { out, directions } => {
                out[i] += v[0] * directions[[i, 0]]
                    + v[1] * directions[[i, 1]]
                    + v[2] * directions[[i, 2]];
            }
        }
    }
}
