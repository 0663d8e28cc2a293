//! Per-panel geometry computations
//!
//! Panels are flat triangles or quadrilaterals given by node-index lists into
//! the grid's node table. All helpers work on stack-allocated 3-vectors so
//! the kernels can stream over targets without heap traffic.

use ndarray::Array2;

/// Cross product of two 3D vectors
#[inline]
pub fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Dot product of two 3D vectors
#[inline]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean norm of a 3D vector
#[inline]
pub fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Difference `a - b`
#[inline]
pub fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Normalize a 3D vector, returning the zero vector for degenerate input
#[inline]
pub fn unit(v: &[f64; 3]) -> [f64; 3] {
    let len = norm(v);
    if len > 1e-15 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Read row `i` of an `(n, 3)` point array as a fixed-size vector
#[inline]
pub fn point(points: &Array2<f64>, i: usize) -> [f64; 3] {
    [points[[i, 0]], points[[i, 1]], points[[i, 2]]]
}

/// Area of a triangular or quadrilateral panel
///
/// Quads are split along the 0-2 diagonal and the two triangle areas summed.
pub fn panel_area(nodes: &Array2<f64>, connectivity: &[usize]) -> f64 {
    let p0 = point(nodes, connectivity[0]);
    let p1 = point(nodes, connectivity[1]);
    let p2 = point(nodes, connectivity[2]);

    let v1 = sub(&p1, &p0);
    let v2 = sub(&p2, &p0);
    let area = 0.5 * norm(&cross(&v1, &v2));

    if connectivity.len() == 4 {
        let p3 = point(nodes, connectivity[3]);
        let v3 = sub(&p3, &p0);
        area + 0.5 * norm(&cross(&v2, &v3))
    } else {
        area
    }
}

/// Unit normal of a panel
///
/// Triangles use the first two edges; quads use the diagonals so that mildly
/// warped cells get a well-defined mean plane. Orientation follows the
/// right-hand rule of the node ordering.
pub fn panel_normal(nodes: &Array2<f64>, connectivity: &[usize]) -> [f64; 3] {
    let p0 = point(nodes, connectivity[0]);
    let p1 = point(nodes, connectivity[1]);
    let p2 = point(nodes, connectivity[2]);

    if connectivity.len() == 4 {
        let p3 = point(nodes, connectivity[3]);
        let d1 = sub(&p2, &p0);
        let d2 = sub(&p3, &p1);
        unit(&cross(&d1, &d2))
    } else {
        let v1 = sub(&p1, &p0);
        let v2 = sub(&p2, &p0);
        unit(&cross(&v1, &v2))
    }
}

/// Centroid (mean of the panel nodes)
pub fn panel_centroid(nodes: &Array2<f64>, connectivity: &[usize]) -> [f64; 3] {
    let mut c = [0.0; 3];
    for &idx in connectivity {
        let p = point(nodes, idx);
        c[0] += p[0];
        c[1] += p[1];
        c[2] += p[2];
    }
    let n = connectivity.len() as f64;
    [c[0] / n, c[1] / n, c[2] / n]
}

/// In-plane unit tangent: the direction of the panel's first edge
pub fn panel_tangent(nodes: &Array2<f64>, connectivity: &[usize]) -> [f64; 3] {
    let p0 = point(nodes, connectivity[0]);
    let p1 = point(nodes, connectivity[1]);
    unit(&sub(&p1, &p0))
}

/// In-plane unit oblique: direction from the first node to the last node
///
/// Together with the tangent this spans the panel plane; the pair is not
/// orthogonal in general.
pub fn panel_oblique(nodes: &Array2<f64>, connectivity: &[usize]) -> [f64; 3] {
    let p0 = point(nodes, connectivity[0]);
    let pl = point(nodes, connectivity[connectivity.len() - 1]);
    unit(&sub(&pl, &p0))
}
