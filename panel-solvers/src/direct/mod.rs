//! Direct dense solvers
//!
//! - [`lu`] - LU factorization with partial pivoting

pub mod lu;

pub use lu::{LuError, LuFactorization, lu_factorize, lu_solve};
