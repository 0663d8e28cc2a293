//! Induced-velocity evaluation at arbitrary targets
//!
//! Sums the solved singularity contributions: every panel's vortex ring at
//! its circulation, every trailing-edge horseshoe at the wake strength of
//! its shedding panel (partnered edges enter with flipped directions, so the
//! shed filament carries the circulation difference), and, for ring+sheet
//! bodies, every panel's uniform vortex sheet.

use ndarray::{Array1, Array2};

use crate::core::body::{LiftingBody, PanelError, TrailingEdge};
use crate::core::fields::{FieldData, FieldLocation};
use crate::core::kernels::{
    KernelOutput, induced_horseshoe, induced_vortex_ring, induced_vortex_sheet,
};
use crate::core::mesh::SurfaceGrid;
use crate::core::mesh::element::point;

/// Accumulate the induced velocity of a solved singularity distribution
///
/// `ring_strengths` holds one circulation per panel; `sheet_strengths`
/// optionally holds per-panel tangential and oblique sheet strengths.
/// Wake strengths follow the shedding panels' circulations. Accumulates
/// `+=` into `out`, shape `(ntargets, 3)`.
pub fn compute_induced_velocity(
    grid: &SurfaceGrid,
    ring_strengths: &Array1<f64>,
    sheet_strengths: Option<(&Array1<f64>, &Array1<f64>)>,
    sheddings: &[TrailingEdge],
    das: &Array2<f64>,
    dbs: &Array2<f64>,
    targets: &Array2<f64>,
    out: &mut Array2<f64>,
    offset: f64,
    cutoff: f64,
) {
    let mut output = KernelOutput::Velocity(out);

    for j in 0..grid.num_cells() {
        induced_vortex_ring(
            &grid.nodes,
            grid.cell(j),
            ring_strengths[j],
            targets,
            &mut output,
            offset,
            cutoff,
        );
    }

    for (k, te) in sheddings.iter().enumerate() {
        let da = point(das, k);
        let db = point(dbs, k);

        induced_horseshoe(
            &grid.nodes,
            te.upper_edge,
            &da,
            &db,
            ring_strengths[te.upper_panel],
            targets,
            &mut output,
            offset,
            cutoff,
        );

        if let Some((lower_panel, lower_edge)) = te.lower {
            induced_horseshoe(
                &grid.nodes,
                lower_edge,
                &db,
                &da,
                ring_strengths[lower_panel],
                targets,
                &mut output,
                offset,
                cutoff,
            );
        }
    }

    if let Some((gamma_t, gamma_o)) = sheet_strengths {
        for j in 0..grid.num_cells() {
            induced_vortex_sheet(
                &grid.nodes,
                grid.cell(j),
                gamma_t[j],
                gamma_o[j],
                targets,
                &mut output,
                offset,
                cutoff,
            );
        }
    }
}

/// Compute the total velocity at the body's control points and store it as
/// the `U` field
///
/// `U = Uinf + induced`, evaluated at the collocation points. Requires a
/// solved body with `Uinf`, `Da` and `Db` fields.
pub fn add_velocity_field(body: &mut LiftingBody) -> Result<(), PanelError> {
    body.ensure_solved("U")?;

    let uinfs = match &body.require_field("Uinf")?.data {
        FieldData::Vector(m) => m.clone(),
        FieldData::Scalar(_) => return Err(PanelError::MissingField("Uinf".to_string())),
    };
    let das = match &body.require_field("Da")?.data {
        FieldData::Vector(m) => m.clone(),
        FieldData::Scalar(_) => return Err(PanelError::MissingField("Da".to_string())),
    };
    let dbs = match &body.require_field("Db")?.data {
        FieldData::Vector(m) => m.clone(),
        FieldData::Scalar(_) => return Err(PanelError::MissingField("Db".to_string())),
    };

    let normals = body.calc_normals();
    let targets = body.calc_control_points(&normals);

    let mut us = uinfs;
    let strength = body.strength();
    let rings = strength.column(0).to_owned();

    let sheet_t;
    let sheet_o;
    let sheets = if strength.ncols() >= 3 {
        sheet_t = strength.column(1).to_owned();
        sheet_o = strength.column(2).to_owned();
        Some((&sheet_t, &sheet_o))
    } else {
        None
    };

    compute_induced_velocity(
        body.grid(),
        &rings,
        sheets,
        body.sheddings(),
        &das,
        &dbs,
        &targets,
        &mut us,
        body.kernel_offset,
        body.kernel_cutoff,
    );

    body.add_field("U", FieldData::Vector(us), FieldLocation::Cell);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    use crate::core::mesh::generators::generate_flat_plate;

    #[test]
    fn test_zero_strengths_induce_nothing() {
        let grid = generate_flat_plate(2, 2, 1.0, 1.0, true);
        let rings = Array1::zeros(grid.num_cells());
        let targets = array![[0.5, 0.5, 1.0]];
        let mut out = Array2::zeros((1, 3));

        compute_induced_velocity(
            &grid,
            &rings,
            None,
            &[],
            &Array2::zeros((0, 3)),
            &Array2::zeros((0, 3)),
            &targets,
            &mut out,
            1e-8,
            1e-14,
        );

        for d in 0..3 {
            assert_relative_eq!(out[[0, d]], 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_wake_strength_follows_shedding_panel() {
        // The wake contribution of an open trailing edge must equal the
        // horseshoe kernel evaluated at the shedding panel's circulation
        let grid = generate_flat_plate(1, 1, 1.0, 1.0, false);
        let te = TrailingEdge {
            upper_panel: 0,
            upper_edge: [1, 3],
            lower: None,
        };
        let mut rings = Array1::zeros(1);
        rings[0] = 0.8;

        let das = array![[1.0, 0.0, 0.0]];
        let dbs = array![[1.0, 0.0, 0.0]];
        let targets = array![[0.5, 0.5, 2.0]];

        let mut full = Array2::zeros((1, 3));
        compute_induced_velocity(
            &grid,
            &rings,
            None,
            std::slice::from_ref(&te),
            &das,
            &dbs,
            &targets,
            &mut full,
            1e-10,
            1e-14,
        );

        // Subtract the ring part to isolate the wake
        let mut ring_only = Array2::zeros((1, 3));
        induced_vortex_ring(
            &grid.nodes,
            grid.cell(0),
            rings[0],
            &targets,
            &mut KernelOutput::Velocity(&mut ring_only),
            1e-10,
            1e-14,
        );

        let mut wake = Array2::zeros((1, 3));
        induced_horseshoe(
            &grid.nodes,
            [1, 3],
            &[1.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0],
            rings[0],
            &targets,
            &mut KernelOutput::Velocity(&mut wake),
            1e-10,
            1e-14,
        );

        for d in 0..3 {
            assert_relative_eq!(
                full[[0, d]],
                ring_only[[0, d]] + wake[[0, d]],
                epsilon = 1e-13
            );
        }
    }
}
