//! Structured mesh generators for tests and demos
//!
//! Small parametric grids (plates, wings, cylinder segments) used by the
//! integration tests. Analysis drivers are expected to bring their own
//! meshes; these generators keep the test suite free of file I/O.

use ndarray::Array2;

use crate::core::body::TrailingEdge;
use crate::core::mesh::grid::SurfaceGrid;

/// Generate a flat rectangular plate in the z = 0 plane
///
/// The plate spans `[0, chord] × [0, span]` with `n_chord × n_span`
/// structured cells. With `triangulated` set each cell is split into two
/// triangles (structured dims become `[2 n_chord, n_span]`); otherwise the
/// cells are quads. Node winding gives +z normals.
pub fn generate_flat_plate(
    n_chord: usize,
    n_span: usize,
    chord: f64,
    span: f64,
    triangulated: bool,
) -> SurfaceGrid {
    let nodes = lattice_nodes(n_chord, n_span, |i, j| {
        [
            chord * i as f64 / n_chord as f64,
            span * j as f64 / n_span as f64,
            0.0,
        ]
    });

    let node = |i: usize, j: usize| i + (n_chord + 1) * j;
    let mut cells = Vec::with_capacity(n_chord * n_span * if triangulated { 2 } else { 1 });

    for j in 0..n_span {
        for i in 0..n_chord {
            let (a, b, c, d) = (node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1));
            if triangulated {
                cells.push(vec![a, b, c]);
                cells.push(vec![a, c, d]);
            } else {
                cells.push(vec![a, b, c, d]);
            }
        }
    }

    let dims = if triangulated {
        [2 * n_chord, n_span]
    } else {
        [n_chord, n_span]
    };
    SurfaceGrid::structured(nodes, cells, dims)
}

/// Generate a flat rectangular wing with an open trailing edge
///
/// Quad cells, chord along +x, span along +y. Returns the grid together with
/// one shedding record per span station: the rearmost panel of each chordwise
/// strip sheds from its downstream edge, with no lower partner.
pub fn generate_wing_grid(
    n_chord: usize,
    n_span: usize,
    chord: f64,
    span: f64,
) -> (SurfaceGrid, Vec<TrailingEdge>) {
    let grid = generate_flat_plate(n_chord, n_span, chord, span, false);

    let node = |i: usize, j: usize| i + (n_chord + 1) * j;
    let sheddings = (0..n_span)
        .map(|j| TrailingEdge {
            upper_panel: (n_chord - 1) + n_chord * j,
            upper_edge: [node(n_chord, j), node(n_chord, j + 1)],
            lower: None,
        })
        .collect();

    (grid, sheddings)
}

/// Generate an open cylinder segment (no end caps)
///
/// The axis lies along +z over `[0, length]`; the surface covers azimuth
/// `[0, arc]` at the given radius with `n_az × n_ax` quad cells. Normals
/// point radially outward.
pub fn generate_cylinder_segment(
    n_az: usize,
    n_ax: usize,
    radius: f64,
    length: f64,
    arc: f64,
) -> SurfaceGrid {
    let nodes = lattice_nodes(n_az, n_ax, |i, j| {
        let theta = arc * i as f64 / n_az as f64;
        [
            radius * theta.cos(),
            radius * theta.sin(),
            length * j as f64 / n_ax as f64,
        ]
    });

    let node = |i: usize, j: usize| i + (n_az + 1) * j;
    let mut cells = Vec::with_capacity(n_az * n_ax);
    for j in 0..n_ax {
        for i in 0..n_az {
            // Winding chosen so the cross of the diagonals points outward
            cells.push(vec![node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)]);
        }
    }

    SurfaceGrid::structured(nodes, cells, [n_az, n_ax])
}

/// Build an `((n1+1)(n2+1), 3)` node table from a lattice parameterization
fn lattice_nodes(
    n1: usize,
    n2: usize,
    position: impl Fn(usize, usize) -> [f64; 3],
) -> Array2<f64> {
    let mut nodes = Array2::zeros(((n1 + 1) * (n2 + 1), 3));
    for j in 0..=n2 {
        for i in 0..=n1 {
            let p = position(i, j);
            let row = i + (n1 + 1) * j;
            for d in 0..3 {
                nodes[[row, d]] = p[d];
            }
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::element::{dot, panel_centroid, panel_normal, unit};

    #[test]
    fn test_flat_plate_triangulated() {
        let grid = generate_flat_plate(2, 2, 1.0, 1.0, true);
        assert_eq!(grid.num_cells(), 8);
        assert_eq!(grid.num_nodes(), 9);
        assert_eq!(grid.grid_dims(), Some([4, 2]));

        let areas = grid.calc_areas();
        assert!((areas.sum() - 1.0).abs() < 1e-12);

        let normals = grid.calc_normals(false);
        for i in 0..grid.num_cells() {
            assert!((normals[[i, 2]] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_plate_quads() {
        let grid = generate_flat_plate(3, 2, 1.5, 1.0, false);
        assert_eq!(grid.num_cells(), 6);
        assert_eq!(grid.grid_dims(), Some([3, 2]));
        assert!((grid.calc_areas().sum() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_wing_shedding_records() {
        let (grid, sheddings) = generate_wing_grid(3, 4, 1.0, 4.0);
        assert_eq!(sheddings.len(), 4);

        for (j, te) in sheddings.iter().enumerate() {
            assert_eq!(te.upper_panel, 2 + 3 * j);
            assert!(te.lower.is_none());
            // Shedding edge sits at the trailing edge x = chord
            for &n in &te.upper_edge {
                assert!((grid.nodes[[n, 0]] - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cylinder_normals_point_outward() {
        let grid = generate_cylinder_segment(8, 3, 0.5, 2.0, std::f64::consts::PI);
        for cell in &grid.cells {
            let n = panel_normal(&grid.nodes, cell);
            let c = panel_centroid(&grid.nodes, cell);
            let radial = unit(&[c[0], c[1], 0.0]);
            assert!(dot(&n, &radial) > 0.9);
        }
    }
}
