//! # Panel method for steady 3D potential flow
//!
//! Dense panel-method solver for incompressible, inviscid, irrotational flow
//! over closed or lifting bodies discretized as triangular (or quadrilateral)
//! surface meshes.
//!
//! ## Features
//!
//! - Vortex-ring and ring+sheet singularity models with rigid semi-infinite
//!   wakes attached to trailing-edge panels
//! - Prescribed-strength elements with least-squares reduction for closed
//!   bodies
//! - Post-processing into induced velocities, pressure coefficients, panel
//!   forces, sectional loads and lift/drag/sideslip resultants
//! - Optional parallel assembly with Rayon (`parallel` feature)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)] // Scientific code often has many parameters

pub mod core;

// Re-exports
pub use crate::core::body::{LiftingBody, PanelError, SingularityModel, SolveOptions, TrailingEdge};
pub use crate::core::mesh::SurfaceGrid;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
