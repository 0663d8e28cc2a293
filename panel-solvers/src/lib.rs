//! Dense direct solvers for panel-method influence systems
//!
//! This crate provides the linear-algebra layer of the panel-method
//! workspace: LU factorization with partial pivoting for the dense,
//! non-symmetric influence matrices produced by collocation assembly, and
//! for the symmetric positive-definite normal-equations systems produced by
//! the least-squares reduction of prescribed elements.
//!
//! # Features
//!
//! - **Direct solver**: LU with partial pivoting, reusable factorization
//!   across right-hand sides
//! - **Generic scalar types**: works with f64 and f32
//!
//! # Example
//!
//! ```ignore
//! use panel_solvers::direct::{lu_factorize, lu_solve};
//!
//! let x = lu_solve(&matrix, &rhs)?;
//!
//! // Or factorize once and solve repeatedly:
//! let fac = lu_factorize(&matrix)?;
//! let x1 = fac.solve(&rhs1)?;
//! let x2 = fac.solve(&rhs2)?;
//! ```

pub mod direct;
pub mod traits;

// Re-export main types
pub use direct::{LuError, LuFactorization, lu_factorize, lu_solve};
pub use traits::Scalar;
