//! Uniform vortex-sheet kernel
//!
//! A panel covered by a constant in-plane vorticity `gamma_t t + gamma_o o`
//! induces `U = gamma x Vsrc`, where `Vsrc` is the velocity of the same
//! panel carrying a unit-strength constant source distribution. `Vsrc` has
//! the classic closed form: per-edge logarithms for the in-plane part and
//! the signed solid angle for the normal part, so the whole kernel reduces
//! to analytic edge-contour integrals.

use ndarray::Array2;
use std::f64::consts::PI;

use crate::core::kernels::KernelOutput;
use crate::core::kernels::doublet::panel_solid_angle;
use crate::core::mesh::element::{
    cross, norm, panel_normal, panel_oblique, panel_tangent, point, sub,
};

/// Velocity of a unit-strength constant source panel at `x`
///
/// `Vsrc = [ sum_k (n x e_k) ln((r_k + r_k+1 - d_k)/(r_k + r_k+1 + d_k))
///           + Omega n ] / 4pi`
/// with `e_k` the unit edge vectors, `d_k` the edge lengths and `Omega` the
/// signed solid angle. Edges closer to the target than `cutoff` are skipped.
fn source_panel_velocity(
    nodes: &Array2<f64>,
    panel: &[usize],
    normal: &[f64; 3],
    x: &[f64; 3],
    offset: f64,
    cutoff: f64,
) -> [f64; 3] {
    let nv = panel.len();
    let eps2 = offset * offset;
    let mut v = [0.0f64; 3];

    for e in 0..nv {
        let a = point(nodes, panel[e]);
        let b = point(nodes, panel[(e + 1) % nv]);

        let edge = sub(&b, &a);
        let d = norm(&edge);
        if d <= 1e-15 {
            continue;
        }

        let ra = norm(&sub(x, &a));
        let rb = norm(&sub(x, &b));
        let reg_a = (ra * ra + eps2).sqrt();
        let reg_b = (rb * rb + eps2).sqrt();

        // Target on the edge segment
        if reg_a + reg_b - d <= cutoff {
            continue;
        }

        let log_term = ((reg_a + reg_b - d) / (reg_a + reg_b + d)).ln();
        let ne = cross(normal, &[edge[0] / d, edge[1] / d, edge[2] / d]);

        v[0] += ne[0] * log_term;
        v[1] += ne[1] * log_term;
        v[2] += ne[2] * log_term;
    }

    let omega = panel_solid_angle(nodes, panel, x, offset, cutoff);
    [
        (v[0] + omega * normal[0]) / (4.0 * PI),
        (v[1] + omega * normal[1]) / (4.0 * PI),
        (v[2] + omega * normal[2]) / (4.0 * PI),
    ]
}

/// Velocity induced by a constant-strength uniform vortex sheet
///
/// The sheet vorticity is `gamma_t` along the panel tangent plus `gamma_o`
/// along its oblique direction. Accumulates `+=` into `out` for every
/// target.
pub fn induced_vortex_sheet(
    nodes: &Array2<f64>,
    panel: &[usize],
    gamma_t: f64,
    gamma_o: f64,
    targets: &Array2<f64>,
    out: &mut KernelOutput,
    offset: f64,
    cutoff: f64,
) {
    let tangent = panel_tangent(nodes, panel);
    let oblique = panel_oblique(nodes, panel);
    let normal = panel_normal(nodes, panel);

    let gamma = [
        gamma_t * tangent[0] + gamma_o * oblique[0],
        gamma_t * tangent[1] + gamma_o * oblique[1],
        gamma_t * tangent[2] + gamma_o * oblique[2],
    ];

    for t in 0..targets.nrows() {
        let x = point(targets, t);
        let vsrc = source_panel_velocity(nodes, panel, &normal, &x, offset, cutoff);
        out.accumulate(t, cross(&gamma, &vsrc));
    }
}
