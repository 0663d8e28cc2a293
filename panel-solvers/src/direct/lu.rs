//! LU decomposition solver
//!
//! Provides LU factorization with partial pivoting for solving the dense
//! linear systems produced by influence-matrix assembly. The factorization is
//! stored so that a single assembly can be solved against several right-hand
//! sides (e.g. one per freestream condition).

use ndarray::{Array1, Array2};

use crate::traits::Scalar;
use thiserror::Error;

/// Errors that can occur during LU factorization and solves
#[derive(Error, Debug)]
pub enum LuError {
    /// Pivot magnitude fell below the singularity threshold
    #[error("matrix is singular or nearly singular")]
    SingularMatrix,
    /// Input dimensions do not match the factorization
    #[error("matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension the operation expected
        expected: usize,
        /// Dimension actually supplied
        got: usize,
    },
}

/// LU factorization result
///
/// Stores the combined L and U factors along with pivot information. L is
/// unit lower triangular and occupies the strict lower part of `lu`.
#[derive(Debug, Clone)]
pub struct LuFactorization<T: Scalar> {
    /// Combined L and U matrices
    pub lu: Array2<T>,
    /// Pivot indices
    pub pivots: Vec<usize>,
    /// Matrix dimension
    pub n: usize,
}

impl<T: Scalar> LuFactorization<T> {
    /// Solve `Ax = b` using the pre-computed factorization.
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>, LuError> {
        let mut x = b.clone();
        self.solve_into(&mut x)?;
        Ok(x)
    }

    /// Solve `Ax = b` in place: on entry `x` holds `b`, on exit the solution.
    ///
    /// This variant performs no allocation, so callers with a pre-allocated
    /// solution buffer can reuse it across solves.
    pub fn solve_into(&self, x: &mut Array1<T>) -> Result<(), LuError> {
        if x.len() != self.n {
            return Err(LuError::DimensionMismatch {
                expected: self.n,
                got: x.len(),
            });
        }

        // Apply row permutations
        for i in 0..self.n {
            let pivot = self.pivots[i];
            if pivot != i {
                x.swap(i, pivot);
            }
        }

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                let update = self.lu[[i, j]] * x[j];
                x[i] = x[i] - update;
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                let update = self.lu[[i, j]] * x[j];
                x[i] = x[i] - update;
            }
            let u_ii = self.lu[[i, i]];
            if u_ii.magnitude() < T::singularity_threshold() {
                return Err(LuError::SingularMatrix);
            }
            x[i] = x[i] / u_ii;
        }

        Ok(())
    }
}

/// Compute the LU factorization of `a` with partial pivoting.
pub fn lu_factorize<T: Scalar>(a: &Array2<T>) -> Result<LuFactorization<T>, LuError> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(LuError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }

    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Find pivot
        let mut max_val = lu[[k, k]].magnitude();
        let mut max_row = k;

        for i in (k + 1)..n {
            let val = lu[[i, k]].magnitude();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        if max_val < T::singularity_threshold() {
            return Err(LuError::SingularMatrix);
        }

        // Swap rows if needed
        if max_row != k {
            for j in 0..n {
                let tmp = lu[[k, j]];
                lu[[k, j]] = lu[[max_row, j]];
                lu[[max_row, j]] = tmp;
            }
            pivots.swap(k, max_row);
        }

        // Compute multipliers and eliminate
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult; // Store multiplier in L part

            for j in (k + 1)..n {
                let update = mult * lu[[k, j]];
                lu[[i, j]] = lu[[i, j]] - update;
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Solve `Ax = b` using LU decomposition.
///
/// Convenience function that combines factorization and solve.
pub fn lu_solve<T: Scalar>(a: &Array2<T>, b: &Array1<T>) -> Result<Array1<T>, LuError> {
    let factorization = lu_factorize(a)?;
    factorization.solve(b)
}
