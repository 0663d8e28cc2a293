//! Surface grid: node table, cell connectivity and derived panel quantities

use ndarray::{Array1, Array2};

use crate::core::mesh::element::{
    panel_area, panel_centroid, panel_normal, panel_oblique, panel_tangent,
};

/// A triangular/quadrilateral surface mesh
///
/// Nodes are stored one per row in an `(nnodes, 3)` array; each cell is a
/// list of 3 or 4 node indices whose winding fixes the panel normal by the
/// right-hand rule. An optional `(nchord, nspan)` pair records the structured
/// layout of grids generated from a 2D parameter space, so post-processors
/// can walk chordwise strips without assuming storage order.
#[derive(Debug, Clone)]
pub struct SurfaceGrid {
    /// Node coordinates, one point per row
    pub nodes: Array2<f64>,
    /// Per-cell node indices (3 or 4 entries each)
    pub cells: Vec<Vec<usize>>,
    /// Structured dimensions `[nchord, nspan]` when the grid is a mapped
    /// 2D lattice; `None` for unstructured grids
    pub structured_dims: Option<[usize; 2]>,
}

impl SurfaceGrid {
    /// Create an unstructured grid from nodes and connectivity
    pub fn new(nodes: Array2<f64>, cells: Vec<Vec<usize>>) -> Self {
        Self {
            nodes,
            cells,
            structured_dims: None,
        }
    }

    /// Create a structured grid with `dims = [nchord, nspan]` cells
    pub fn structured(nodes: Array2<f64>, cells: Vec<Vec<usize>>, dims: [usize; 2]) -> Self {
        Self {
            nodes,
            cells,
            structured_dims: Some(dims),
        }
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.nrows()
    }

    /// Number of cells (panels)
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Node indices of panel `i`
    pub fn cell(&self, i: usize) -> &[usize] {
        &self.cells[i]
    }

    /// Structured dimensions `[nchord, nspan]`, if any
    pub fn grid_dims(&self) -> Option<[usize; 2]> {
        self.structured_dims
    }

    /// Linear panel index of structured coordinates `(i_chord, i_span)`
    ///
    /// Chordwise index runs fastest. Returns `None` for unstructured grids.
    pub fn linear_index(&self, i_chord: usize, i_span: usize) -> Option<usize> {
        self.structured_dims
            .map(|[nchord, _]| i_chord + nchord * i_span)
    }

    /// Per-panel areas
    pub fn calc_areas(&self) -> Array1<f64> {
        Array1::from_iter(self.cells.iter().map(|c| panel_area(&self.nodes, c)))
    }

    /// Per-panel unit normals as an `(ncells, 3)` array
    ///
    /// With `flip` set the normals are negated, matching bodies whose control
    /// points are offset into the interior.
    pub fn calc_normals(&self, flip: bool) -> Array2<f64> {
        let sign = if flip { -1.0 } else { 1.0 };
        let mut out = Array2::zeros((self.num_cells(), 3));
        for (i, cell) in self.cells.iter().enumerate() {
            let n = panel_normal(&self.nodes, cell);
            for d in 0..3 {
                out[[i, d]] = sign * n[d];
            }
        }
        out
    }

    /// Per-panel unit tangents (first-edge direction)
    pub fn calc_tangents(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.num_cells(), 3));
        for (i, cell) in self.cells.iter().enumerate() {
            let t = panel_tangent(&self.nodes, cell);
            for d in 0..3 {
                out[[i, d]] = t[d];
            }
        }
        out
    }

    /// Per-panel unit obliques (first-to-last-node direction)
    pub fn calc_obliques(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.num_cells(), 3));
        for (i, cell) in self.cells.iter().enumerate() {
            let o = panel_oblique(&self.nodes, cell);
            for d in 0..3 {
                out[[i, d]] = o[d];
            }
        }
        out
    }

    /// Per-panel centroids
    pub fn calc_centroids(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.num_cells(), 3));
        for (i, cell) in self.cells.iter().enumerate() {
            let c = panel_centroid(&self.nodes, cell);
            for d in 0..3 {
                out[[i, d]] = c[d];
            }
        }
        out
    }

    /// Per-panel characteristic lengths, `sqrt(area)`
    pub fn characteristic_lengths(&self) -> Array1<f64> {
        self.calc_areas().mapv(f64::sqrt)
    }

    /// Collocation points: centroids offset along the given normals by
    /// `off × L` where `L` is the panel characteristic length
    ///
    /// A negative `off` places the points on the opposite side of the
    /// surface.
    pub fn calc_control_points(&self, normals: &Array2<f64>, off: f64) -> Array2<f64> {
        let mut cps = self.calc_centroids();
        let lengths = self.characteristic_lengths();
        for i in 0..self.num_cells() {
            for d in 0..3 {
                cps[[i, d]] += off * lengths[i] * normals[[i, d]];
            }
        }
        cps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_triangle_square() -> SurfaceGrid {
        let nodes = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0]
        ];
        SurfaceGrid::new(nodes, vec![vec![0, 1, 2], vec![0, 2, 3]])
    }

    #[test]
    fn test_areas_sum_to_square() {
        let grid = two_triangle_square();
        let areas = grid.calc_areas();
        assert!((areas.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normals_and_flip() {
        let grid = two_triangle_square();
        let normals = grid.calc_normals(false);
        assert!((normals[[0, 2]] - 1.0).abs() < 1e-12);

        let flipped = grid.calc_normals(true);
        assert!((flipped[[0, 2]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_control_points_offset() {
        let grid = two_triangle_square();
        let normals = grid.calc_normals(false);
        let cps = grid.calc_control_points(&normals, 0.1);

        // Characteristic length of a half-unit triangle is sqrt(0.5)
        let expected_z = 0.1 * 0.5f64.sqrt();
        assert!((cps[[0, 2]] - expected_z).abs() < 1e-12);
        assert!((cps[[1, 2]] - expected_z).abs() < 1e-12);
    }

    #[test]
    fn test_linear_index() {
        let mut grid = two_triangle_square();
        assert_eq!(grid.linear_index(0, 0), None);

        grid.structured_dims = Some([2, 1]);
        assert_eq!(grid.linear_index(1, 0), Some(1));
        assert_eq!(grid.grid_dims(), Some([2, 1]));
    }
}
