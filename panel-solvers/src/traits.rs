//! Scalar abstraction for the direct solvers
//!
//! Influence matrices in a steady potential-flow solver are real-valued, so
//! the solvers are generic over floating-point scalars rather than complex
//! fields.

use std::fmt::Debug;

use num_traits::{Float, FromPrimitive};

/// Floating-point scalar usable by the dense solvers.
///
/// Blanket-implemented for `f32` and `f64`.
pub trait Scalar: Float + FromPrimitive + Debug + Send + Sync + 'static {
    /// Magnitude used for pivot selection and singularity checks.
    fn magnitude(self) -> Self {
        self.abs()
    }

    /// Threshold below which a pivot is treated as singular.
    fn singularity_threshold() -> Self {
        Self::from_f64(1e-30).unwrap_or_else(Self::min_positive_value)
    }
}

impl<T> Scalar for T where T: Float + FromPrimitive + Debug + Send + Sync + 'static {}
