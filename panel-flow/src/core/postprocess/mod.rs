//! Post-processing of solved bodies
//!
//! - [`velocity`] - induced and total velocity at arbitrary targets
//! - [`forces`] - pressure coefficients, panel forces, sectional loads,
//!   integrated force and its lift/drag/sideslip decomposition
//!
//! The computational routines operate on explicit arrays so they are
//! decoupled from the body's field store; the `add_*_field` wrappers read
//! the required named fields from a solved body and append their results.

pub mod forces;
pub mod velocity;

pub use forces::{
    add_force_field, add_lds_fields, add_pressure_field, add_sectional_force_field,
    add_total_force_field, compute_panel_forces, compute_pressure_coefficient,
    compute_sectional_force, compute_total_force, decompose_lds,
};
pub use velocity::{add_velocity_field, compute_induced_velocity};
