//! Doublet potential kernels
//!
//! The potential of a constant-strength doublet distribution depends only on
//! the signed solid angle its boundary subtends at the target:
//! `phi = mu * Omega / 4pi`. The solid angle of a triangle is evaluated with
//! the Van Oosterom–Strakee arctangent formula, which only needs the unit
//! directions from the target to the vertices; vertices at infinity (the
//! semi-infinite wake strip) enter through their limit directions.

use ndarray::{Array1, Array2};
use std::f64::consts::PI;

use crate::core::mesh::element::{cross, dot, norm, point, sub};

/// Van Oosterom–Strakee solid angle of a triangle given unit directions
/// from the target to its three vertices
#[inline]
fn triangle_solid_angle(u1: &[f64; 3], u2: &[f64; 3], u3: &[f64; 3]) -> f64 {
    let numerator = dot(u1, &cross(u2, u3));
    let denominator = 1.0 + dot(u1, u2) + dot(u2, u3) + dot(u3, u1);
    2.0 * numerator.atan2(denominator)
}

/// Regularized unit direction from `x` toward `p`, plus the true distance
#[inline]
fn direction_to(p: &[f64; 3], x: &[f64; 3], offset: f64) -> ([f64; 3], f64) {
    let r = sub(p, x);
    let rn = norm(&r);
    let reg = (rn * rn + offset * offset).sqrt();
    if reg > 0.0 {
        ([r[0] / reg, r[1] / reg, r[2] / reg], rn)
    } else {
        ([0.0; 3], 0.0)
    }
}

/// Signed solid angle subtended by a panel at `x`
///
/// The panel polygon is fanned into triangles from its first node. The sign
/// convention makes the angle positive on the side its normal points to
/// (+2pi just off the surface on that side). Triangles with a vertex within
/// `cutoff` of the target are skipped.
pub(crate) fn panel_solid_angle(
    nodes: &Array2<f64>,
    panel: &[usize],
    x: &[f64; 3],
    offset: f64,
    cutoff: f64,
) -> f64 {
    let p0 = point(nodes, panel[0]);
    let (u0, r0) = direction_to(&p0, x, offset);

    let mut omega = 0.0;
    for k in 1..panel.len() - 1 {
        let pa = point(nodes, panel[k]);
        let pb = point(nodes, panel[k + 1]);
        let (ua, ra) = direction_to(&pa, x, offset);
        let (ub, rb) = direction_to(&pb, x, offset);

        if r0 <= cutoff || ra <= cutoff || rb <= cutoff {
            continue;
        }
        omega -= triangle_solid_angle(&u0, &ua, &ub);
    }
    omega
}

/// Potential of a constant-strength doublet panel
///
/// The doublet axis follows the panel normal (right-hand rule of the node
/// ordering); the potential tends to `+mu/2` just off the surface on the
/// normal side. Accumulates `+=` into `out` for every target.
pub fn potential_doublet_panel(
    nodes: &Array2<f64>,
    panel: &[usize],
    mu: f64,
    targets: &Array2<f64>,
    out: &mut Array1<f64>,
    offset: f64,
    cutoff: f64,
) {
    for t in 0..targets.nrows() {
        let x = point(targets, t);
        let omega = panel_solid_angle(nodes, panel, &x, offset, cutoff);
        out[t] += mu * omega / (4.0 * PI);
    }
}

/// Potential of the semi-infinite doublet wake strip behind a trailing edge
///
/// The strip is bounded by the edge `edge[0] -> edge[1]` and the two
/// semi-infinite rays leaving its endpoints along the unit directions `da`
/// and `db`. Its solid angle is the limit of the quad
/// `(a, b, b + R db, a + R da)` as `R -> inf`, where the far vertices enter
/// the arctangent formula through `da` and `db` directly. The strip normal
/// follows the right-hand rule of the winding `a -> b -> inf`.
pub fn potential_doublet_wake_strip(
    nodes: &Array2<f64>,
    edge: [usize; 2],
    da: &[f64; 3],
    db: &[f64; 3],
    mu: f64,
    targets: &Array2<f64>,
    out: &mut Array1<f64>,
    offset: f64,
    cutoff: f64,
) {
    let a = point(nodes, edge[0]);
    let b = point(nodes, edge[1]);

    for t in 0..targets.nrows() {
        let x = point(targets, t);
        let (ua, ra) = direction_to(&a, &x, offset);
        let (ub, rb) = direction_to(&b, &x, offset);

        if ra <= cutoff || rb <= cutoff {
            continue;
        }

        let mut omega = -triangle_solid_angle(&ua, &ub, db);
        omega -= triangle_solid_angle(&ua, db, da);

        out[t] += mu * omega / (4.0 * PI);
    }
}
