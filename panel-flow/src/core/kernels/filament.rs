//! Vortex filament kernels
//!
//! Biot–Savart velocity of finite straight filaments (summed into panel
//! vortex rings) and of the semi-infinite filaments that close a
//! trailing-edge horseshoe.

use ndarray::Array2;
use std::f64::consts::PI;

use crate::core::kernels::KernelOutput;
use crate::core::mesh::element::{cross, dot, norm, point, sub};

/// Velocity of a unit-strength straight filament from `a` to `b` at `x`
///
/// Standard finite-filament form
/// `V = (r1×r2)/(|r1×r2|² + ε²) · (r0·r̂1 − r0·r̂2) / 4π`
/// with circulation flowing from `a` to `b`. Targets on the filament line
/// (within `cutoff` of it, or of either endpoint) contribute nothing.
#[inline]
fn bound_filament(a: &[f64; 3], b: &[f64; 3], x: &[f64; 3], offset: f64, cutoff: f64) -> [f64; 3] {
    let r1 = sub(x, a);
    let r2 = sub(x, b);
    let r0 = sub(b, a);

    let cr = cross(&r1, &r2);
    let cr2 = dot(&cr, &cr);
    let norm1 = norm(&r1);
    let norm2 = norm(&r2);
    let len2 = dot(&r0, &r0);

    // Distance to the filament line is |r1×r2| / |r0|
    if norm1 <= cutoff || norm2 <= cutoff || cr2 <= cutoff * cutoff * len2 {
        return [0.0; 3];
    }

    let eps2 = offset * offset;
    let reg1 = (norm1 * norm1 + eps2).sqrt();
    let reg2 = (norm2 * norm2 + eps2).sqrt();
    let k = (dot(&r0, &r1) / reg1 - dot(&r0, &r2) / reg2) / (4.0 * PI * (cr2 + eps2));

    [k * cr[0], k * cr[1], k * cr[2]]
}

/// Velocity of a unit-strength semi-infinite filament at `x`
///
/// The filament starts at `a` and extends to infinity along the unit
/// direction `d`, with circulation flowing away from `a`.
#[inline]
fn semi_infinite_filament(
    a: &[f64; 3],
    d: &[f64; 3],
    x: &[f64; 3],
    offset: f64,
    cutoff: f64,
) -> [f64; 3] {
    let r = sub(x, a);
    let cr = cross(d, &r);
    let cr2 = dot(&cr, &cr);
    let rn = norm(&r);

    if rn <= cutoff || cr2 <= cutoff * cutoff {
        return [0.0; 3];
    }

    let eps2 = offset * offset;
    let reg = (rn * rn + eps2).sqrt();
    let k = (1.0 + dot(d, &r) / reg) / (4.0 * PI * (cr2 + eps2));

    [k * cr[0], k * cr[1], k * cr[2]]
}

/// Velocity induced by a constant-strength vortex ring panel
///
/// Biot–Savart sum over the closed polygonal loop traced by the panel's
/// nodes (3 or 4). Edges touching the target are skipped. Accumulates `+=`
/// into `out` for every target.
pub fn induced_vortex_ring(
    nodes: &Array2<f64>,
    panel: &[usize],
    gamma: f64,
    targets: &Array2<f64>,
    out: &mut KernelOutput,
    offset: f64,
    cutoff: f64,
) {
    let nv = panel.len();
    for t in 0..targets.nrows() {
        let x = point(targets, t);
        let mut v = [0.0f64; 3];

        for e in 0..nv {
            let a = point(nodes, panel[e]);
            let b = point(nodes, panel[(e + 1) % nv]);
            let dv = bound_filament(&a, &b, &x, offset, cutoff);
            v[0] += dv[0];
            v[1] += dv[1];
            v[2] += dv[2];
        }

        out.accumulate(t, [gamma * v[0], gamma * v[1], gamma * v[2]]);
    }
}

/// Velocity induced by a semi-infinite horseshoe attached to a trailing edge
///
/// The filament path runs from infinity along `-da` into node `edge[0]`,
/// across the bound segment to node `edge[1]`, and back out to infinity
/// along `db`. `da` and `db` must be unit vectors. Evaluating with the edge
/// nodes and directions both swapped yields the negated horseshoe, which is
/// how the lower panel of a closed trailing edge enters the system.
pub fn induced_horseshoe(
    nodes: &Array2<f64>,
    edge: [usize; 2],
    da: &[f64; 3],
    db: &[f64; 3],
    gamma: f64,
    targets: &Array2<f64>,
    out: &mut KernelOutput,
    offset: f64,
    cutoff: f64,
) {
    let a = point(nodes, edge[0]);
    let b = point(nodes, edge[1]);

    for t in 0..targets.nrows() {
        let x = point(targets, t);

        let incoming = semi_infinite_filament(&a, da, &x, offset, cutoff);
        let bound = bound_filament(&a, &b, &x, offset, cutoff);
        let outgoing = semi_infinite_filament(&b, db, &x, offset, cutoff);

        out.accumulate(
            t,
            [
                gamma * (bound[0] + outgoing[0] - incoming[0]),
                gamma * (bound[1] + outgoing[1] - incoming[1]),
                gamma * (bound[2] + outgoing[2] - incoming[2]),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    fn square_panel() -> Array2<f64> {
        array![
            [-0.5, -0.5, 0.0],
            [0.5, -0.5, 0.0],
            [0.5, 0.5, 0.0],
            [-0.5, 0.5, 0.0]
        ]
    }

    fn eval_ring(nodes: &Array2<f64>, panel: &[usize], gamma: f64, x: [f64; 3]) -> [f64; 3] {
        let targets = Array2::from_shape_vec((1, 3), x.to_vec()).unwrap();
        let mut out = Array2::zeros((1, 3));
        induced_vortex_ring(
            nodes,
            panel,
            gamma,
            &targets,
            &mut KernelOutput::Velocity(&mut out),
            0.0,
            1e-14,
        );
        [out[[0, 0]], out[[0, 1]], out[[0, 2]]]
    }

    #[test]
    fn test_semi_infinite_matches_analytical() {
        // Filament from the origin along +x; at (0, y, 0) the classic result
        // is Gamma / (4 pi y) in +z
        let a = [0.0, 0.0, 0.0];
        let d = [1.0, 0.0, 0.0];
        let v = semi_infinite_filament(&a, &d, &[0.0, 2.0, 0.0], 0.0, 1e-14);

        assert_relative_eq!(v[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[2], 1.0 / (4.0 * PI * 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_ring_center_velocity_square_loop() {
        // Unit-circulation square loop of side L: center velocity is
        // 2 sqrt(2) Gamma / (pi L), normal to the loop plane
        let nodes = square_panel();
        let v = eval_ring(&nodes, &[0, 1, 2, 3], 1.0, [0.0, 0.0, 0.0]);

        let expected = 2.0 * 2.0f64.sqrt() / PI;
        assert_relative_eq!(v[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(v[2].abs(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_ring_reversal_negates_velocity() {
        let nodes = square_panel();
        let x = [0.3, -0.2, 0.7];

        let v = eval_ring(&nodes, &[0, 1, 2, 3], 1.0, x);
        let vr = eval_ring(&nodes, &[3, 2, 1, 0], 1.0, x);

        for d in 0..3 {
            assert_relative_eq!(v[d], -vr[d], epsilon = 1e-13);
        }
    }

    #[test]
    fn test_ring_skips_target_at_vertex() {
        let nodes = square_panel();
        let v = eval_ring(&nodes, &[0, 1, 2, 3], 1.0, [0.5, 0.5, 0.0]);
        // Adjacent edges are skipped; the remaining edges are coplanar with
        // the target so the full velocity is finite
        assert!(v.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_horseshoe_flip_negates() {
        let nodes = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let da = [1.0, 0.0, 0.0];
        let db = [1.0, 0.0, 0.0];
        let targets = array![[-1.0, 0.5, 0.4]];

        let mut out = Array2::zeros((1, 3));
        induced_horseshoe(
            &nodes,
            [0, 1],
            &da,
            &db,
            1.0,
            &targets,
            &mut KernelOutput::Velocity(&mut out),
            0.0,
            1e-14,
        );

        let mut flipped = Array2::zeros((1, 3));
        induced_horseshoe(
            &nodes,
            [1, 0],
            &db,
            &da,
            1.0,
            &targets,
            &mut KernelOutput::Velocity(&mut flipped),
            0.0,
            1e-14,
        );

        for d in 0..3 {
            assert_relative_eq!(out[[0, d]], -flipped[[0, d]], epsilon = 1e-13);
        }
    }

    #[test]
    fn test_projected_output_matches_dotted_velocity() {
        let nodes = square_panel();
        let targets = array![[0.1, 0.2, 0.5], [-0.3, 0.1, 1.0]];
        let directions = array![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];

        let mut vel = Array2::zeros((2, 3));
        induced_vortex_ring(
            &nodes,
            &[0, 1, 2, 3],
            0.7,
            &targets,
            &mut KernelOutput::Velocity(&mut vel),
            0.0,
            1e-14,
        );

        let mut proj = Array1::zeros(2);
        induced_vortex_ring(
            &nodes,
            &[0, 1, 2, 3],
            0.7,
            &targets,
            &mut KernelOutput::Projected {
                out: &mut proj,
                directions: &directions,
            },
            0.0,
            1e-14,
        );

        assert_relative_eq!(proj[0], vel[[0, 2]], epsilon = 1e-13);
        assert_relative_eq!(proj[1], vel[[1, 0]], epsilon = 1e-13);
    }

    #[test]
    fn test_regularization_keeps_on_panel_target_finite() {
        let nodes = square_panel();
        let targets = array![[0.25, 0.0, 0.0]];
        let mut out = Array2::zeros((1, 3));
        induced_vortex_ring(
            &nodes,
            &[0, 1, 2, 3],
            1.0,
            &targets,
            &mut KernelOutput::Velocity(&mut out),
            1e-3,
            1e-14,
        );
        assert!(out.iter().all(|c| c.is_finite()));
    }
}
