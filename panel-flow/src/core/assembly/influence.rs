//! Dense influence assembly for vortex-ring bodies
//!
//! Builds `G[i, j] = (velocity induced at control point i by unit strength
//! of panel j) . n_i` and the no-flow-through right-hand side
//! `b[i] = -Uinf_i . n_i`, then layers on wake folding, prescribed-element
//! reduction and the checkerboard vortex-sheet column of the ring+sheet
//! model.

use ndarray::{Array1, Array2};

use crate::core::body::TrailingEdge;
use crate::core::kernels::{KernelOutput, induced_horseshoe, induced_vortex_ring};
use crate::core::kernels::induced_vortex_sheet;
use crate::core::mesh::SurfaceGrid;
use crate::core::mesh::element::point;

/// Assembled influence system
pub struct InfluenceSystem {
    /// Influence matrix, `(ncells, ncells)`
    pub matrix: Array2<f64>,
    /// Right-hand side, `-Uinf . n` per control point
    pub rhs: Array1<f64>,
    /// Number of panels
    pub num_panels: usize,
}

/// Checkerboard sign of panel `j` used by the ring+sheet model
///
/// Panels alternate sign starting negative on the first panel, so that the
/// tangent/oblique orientations of neighbouring panels line up.
#[inline]
pub(crate) fn checkerboard_sign(j: usize) -> f64 {
    if j % 2 == 0 { -1.0 } else { 1.0 }
}

/// Build the vortex-ring influence system with trailing-edge wakes folded in
///
/// Each panel contributes one column of ring influence. For every shedding
/// record the semi-infinite horseshoe along `(da, db)` is added to the upper
/// panel's column; a lower partner, when present, receives the horseshoe of
/// its own edge with flipped directions `(db, da)`, which evaluates to the
/// negated wake so that row `i` sees the strength difference
/// `Gamma_u - Gamma_l` on the shed filament.
pub fn build_ring_influence(
    grid: &SurfaceGrid,
    sheddings: &[TrailingEdge],
    das: &Array2<f64>,
    dbs: &Array2<f64>,
    control_points: &Array2<f64>,
    normals: &Array2<f64>,
    uinfs: &Array2<f64>,
    offset: f64,
    cutoff: f64,
) -> InfluenceSystem {
    let n = grid.num_cells();
    let mut matrix = Array2::zeros((n, n));
    let mut scratch = Array1::zeros(n);

    for j in 0..n {
        scratch.fill(0.0);
        induced_vortex_ring(
            &grid.nodes,
            grid.cell(j),
            1.0,
            control_points,
            &mut KernelOutput::Projected {
                out: &mut scratch,
                directions: normals,
            },
            offset,
            cutoff,
        );
        for i in 0..n {
            matrix[[i, j]] += scratch[i];
        }
    }

    fold_wakes(
        grid,
        sheddings,
        das,
        dbs,
        control_points,
        normals,
        &mut matrix,
        &mut scratch,
        offset,
        cutoff,
    );

    let rhs = no_flow_through_rhs(uinfs, normals);

    InfluenceSystem {
        matrix,
        rhs,
        num_panels: n,
    }
}

/// Add the wake influence of every shedding record into its panels' columns
fn fold_wakes(
    grid: &SurfaceGrid,
    sheddings: &[TrailingEdge],
    das: &Array2<f64>,
    dbs: &Array2<f64>,
    control_points: &Array2<f64>,
    normals: &Array2<f64>,
    matrix: &mut Array2<f64>,
    scratch: &mut Array1<f64>,
    offset: f64,
    cutoff: f64,
) {
    let n = matrix.nrows();

    for (k, te) in sheddings.iter().enumerate() {
        let da = point(das, k);
        let db = point(dbs, k);

        scratch.fill(0.0);
        induced_horseshoe(
            &grid.nodes,
            te.upper_edge,
            &da,
            &db,
            1.0,
            control_points,
            &mut KernelOutput::Projected {
                out: &mut *scratch,
                directions: normals,
            },
            offset,
            cutoff,
        );
        for i in 0..n {
            matrix[[i, te.upper_panel]] += scratch[i];
        }

        if let Some((lower_panel, lower_edge)) = te.lower {
            scratch.fill(0.0);
            induced_horseshoe(
                &grid.nodes,
                lower_edge,
                &db,
                &da,
                1.0,
                control_points,
                &mut KernelOutput::Projected {
                    out: &mut *scratch,
                    directions: normals,
                },
                offset,
                cutoff,
            );
            for i in 0..n {
                matrix[[i, lower_panel]] += scratch[i];
            }
        }
    }
}

/// No-flow-through right-hand side `b[i] = -Uinf_i . n_i`
fn no_flow_through_rhs(uinfs: &Array2<f64>, normals: &Array2<f64>) -> Array1<f64> {
    let n = uinfs.nrows();
    let mut rhs = Array1::zeros(n);
    for i in 0..n {
        rhs[i] = -(uinfs[[i, 0]] * normals[[i, 0]]
            + uinfs[[i, 1]] * normals[[i, 1]]
            + uinfs[[i, 2]] * normals[[i, 2]]);
    }
    rhs
}

/// Build the ring influence system with columns assembled in parallel
///
/// Column accumulation has a single writer per column, so the panels can be
/// distributed across threads; wake folding and the RHS stay sequential.
#[cfg(feature = "parallel")]
pub fn build_ring_influence_parallel(
    grid: &SurfaceGrid,
    sheddings: &[TrailingEdge],
    das: &Array2<f64>,
    dbs: &Array2<f64>,
    control_points: &Array2<f64>,
    normals: &Array2<f64>,
    uinfs: &Array2<f64>,
    offset: f64,
    cutoff: f64,
) -> InfluenceSystem {
    use rayon::prelude::*;

    let n = grid.num_cells();

    let columns: Vec<Array1<f64>> = (0..n)
        .into_par_iter()
        .map(|j| {
            let mut col = Array1::zeros(n);
            induced_vortex_ring(
                &grid.nodes,
                grid.cell(j),
                1.0,
                control_points,
                &mut KernelOutput::Projected {
                    out: &mut col,
                    directions: normals,
                },
                offset,
                cutoff,
            );
            col
        })
        .collect();

    let mut matrix = Array2::zeros((n, n));
    for (j, col) in columns.iter().enumerate() {
        for i in 0..n {
            matrix[[i, j]] = col[i];
        }
    }

    let mut scratch = Array1::zeros(n);
    fold_wakes(
        grid,
        sheddings,
        das,
        dbs,
        control_points,
        normals,
        &mut matrix,
        &mut scratch,
        offset,
        cutoff,
    );

    let rhs = no_flow_through_rhs(uinfs, normals);

    InfluenceSystem {
        matrix,
        rhs,
        num_panels: n,
    }
}

/// Move prescribed columns to the right-hand side and strike them
///
/// Returns the reduced matrix, the modified right-hand side and the surviving
/// column indices in their original order. `prescribed` must be sorted by
/// panel index.
pub fn apply_prescribed(
    system: &InfluenceSystem,
    prescribed: &[(usize, f64)],
) -> (Array2<f64>, Array1<f64>, Vec<usize>) {
    let n = system.num_panels;
    let mut rhs = system.rhs.clone();

    for &(idx, value) in prescribed {
        for i in 0..n {
            rhs[i] -= system.matrix[[i, idx]] * value;
        }
    }

    let kept: Vec<usize> = (0..n)
        .filter(|j| !prescribed.iter().any(|&(idx, _)| idx == *j))
        .collect();

    let mut reduced = Array2::zeros((n, kept.len()));
    for (jr, &j) in kept.iter().enumerate() {
        for i in 0..n {
            reduced[[i, jr]] = system.matrix[[i, j]];
        }
    }

    (reduced, rhs, kept)
}

/// Form the least-squares normal equations `(G^T G, G^T b)`
pub fn normal_equations(reduced: &Array2<f64>, rhs: &Array1<f64>) -> (Array2<f64>, Array1<f64>) {
    (reduced.t().dot(reduced), reduced.t().dot(rhs))
}

/// Scatter a reduced solution back to full panel indexing
///
/// Prescribed panels receive their prescribed values exactly.
pub fn reinject_prescribed(
    solution: &Array1<f64>,
    prescribed: &[(usize, f64)],
    kept: &[usize],
    num_panels: usize,
) -> Array1<f64> {
    let mut full = Array1::zeros(num_panels);
    for (jr, &j) in kept.iter().enumerate() {
        full[j] = solution[jr];
    }
    for &(idx, value) in prescribed {
        full[idx] = value;
    }
    full
}

/// Add the checkerboard vortex-sheet influence into one column
///
/// Used by the ring+sheet model: every panel contributes a uniform sheet of
/// strength `(s_j w_t, s_j w_o)` with the alternating sign, all accumulated
/// into the single prescribed column so the solved value of that unknown
/// becomes the global sheet strength.
pub fn add_sheet_influence(
    grid: &SurfaceGrid,
    control_points: &Array2<f64>,
    normals: &Array2<f64>,
    column: usize,
    weights: (f64, f64),
    matrix: &mut Array2<f64>,
    offset: f64,
    cutoff: f64,
) {
    let n = grid.num_cells();
    let mut scratch = Array1::zeros(n);

    for j in 0..n {
        let sign = checkerboard_sign(j);
        scratch.fill(0.0);
        induced_vortex_sheet(
            &grid.nodes,
            grid.cell(j),
            sign * weights.0,
            sign * weights.1,
            control_points,
            &mut KernelOutput::Projected {
                out: &mut scratch,
                directions: normals,
            },
            offset,
            cutoff,
        );
        for i in 0..n {
            matrix[[i, column]] += scratch[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn small_system() -> InfluenceSystem {
        InfluenceSystem {
            matrix: array![[2.0, 1.0, 0.5], [1.0, 3.0, 0.2], [0.1, 0.2, 1.0]],
            rhs: array![1.0, 2.0, 3.0],
            num_panels: 3,
        }
    }

    #[test]
    fn test_apply_prescribed_moves_column() {
        let system = small_system();
        let (reduced, rhs, kept) = apply_prescribed(&system, &[(1, 2.0)]);

        assert_eq!(kept, vec![0, 2]);
        assert_eq!(reduced.shape(), &[3, 2]);

        // b -= 2.0 * G[:, 1]
        assert_relative_eq!(rhs[0], 1.0 - 2.0, epsilon = 1e-14);
        assert_relative_eq!(rhs[1], 2.0 - 6.0, epsilon = 1e-14);
        assert_relative_eq!(rhs[2], 3.0 - 0.4, epsilon = 1e-14);

        // Remaining columns untouched
        assert_relative_eq!(reduced[[0, 0]], 2.0, epsilon = 1e-14);
        assert_relative_eq!(reduced[[0, 1]], 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_normal_equations_shapes_and_symmetry() {
        let system = small_system();
        let (reduced, rhs, _) = apply_prescribed(&system, &[(0, 0.0)]);
        let (gtg, gtb) = normal_equations(&reduced, &rhs);

        assert_eq!(gtg.shape(), &[2, 2]);
        assert_eq!(gtb.len(), 2);
        assert_relative_eq!(gtg[[0, 1]], gtg[[1, 0]], epsilon = 1e-14);
    }

    #[test]
    fn test_reinject_prescribed() {
        let solution = array![7.0, 9.0];
        let full = reinject_prescribed(&solution, &[(1, 2.5)], &[0, 2], 3);

        assert_eq!(full, array![7.0, 2.5, 9.0]);
    }

    #[test]
    fn test_checkerboard_sign_alternates() {
        assert_eq!(checkerboard_sign(0), -1.0);
        assert_eq!(checkerboard_sign(1), 1.0);
        assert_eq!(checkerboard_sign(2), -1.0);
    }
}
