//! Panel-method core
//!
//! ## Architecture
//!
//! - `mesh`: surface grids, per-panel geometry, and mesh generators
//! - `kernels`: closed-form singular kernels (vortex rings, horseshoes,
//!   vortex sheets, doublet potentials)
//! - `assembly`: influence-matrix and right-hand-side assembly, wake folding,
//!   prescribed-element reduction
//! - `body`: the lifting body, its solve orchestration and error type
//! - `fields`: named result field store
//! - `postprocess`: induced velocities, pressure coefficients and forces

pub mod assembly;
pub mod body;
pub mod fields;
pub mod kernels;
pub mod mesh;
pub mod postprocess;

// Re-exports for convenience
pub use body::{LiftingBody, PanelError, SingularityModel, SolveOptions, SolverMethod, TrailingEdge};
pub use fields::{FieldData, FieldEntry, FieldLocation, FieldStore};
pub use mesh::SurfaceGrid;
