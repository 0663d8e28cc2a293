//! Pressure and force post-processing
//!
//! Pressure coefficients from the velocity field, per-panel forces,
//! spanwise sectional loads on structured grids, the integrated total force
//! and its decomposition onto lift/drag/sideslip axes.

use ndarray::{Array1, Array2};

use crate::core::body::{LiftingBody, PanelError};
use crate::core::fields::{FieldData, FieldLocation};

/// Pressure coefficient `Cp = 1 - (|U| / U_ref)^2` per entry
pub fn compute_pressure_coefficient(us: &Array2<f64>, u_ref: f64) -> Array1<f64> {
    let n = us.nrows();
    let mut cp = Array1::zeros(n);
    for i in 0..n {
        let speed2 = us[[i, 0]].powi(2) + us[[i, 1]].powi(2) + us[[i, 2]].powi(2);
        cp[i] = 1.0 - speed2 / (u_ref * u_ref);
    }
    cp
}

/// Per-panel force `F_i = 1/2 rho (|U_i|^2 - U_inf^2) A_i n_i`
///
/// Equivalent to `-Cp 1/2 rho U_inf^2 A n` when the reference speed equals
/// the freestream speed.
pub fn compute_panel_forces(
    us: &Array2<f64>,
    areas: &Array1<f64>,
    normals: &Array2<f64>,
    rho: f64,
    u_inf: f64,
) -> Array2<f64> {
    let n = us.nrows();
    let mut forces = Array2::zeros((n, 3));
    for i in 0..n {
        let speed2 = us[[i, 0]].powi(2) + us[[i, 1]].powi(2) + us[[i, 2]].powi(2);
        let magnitude = 0.5 * rho * (speed2 - u_inf * u_inf) * areas[i];
        for d in 0..3 {
            forces[[i, d]] = magnitude * normals[[i, d]];
        }
    }
    forces
}

/// Integrated total force: column-wise sum of the panel forces
pub fn compute_total_force(forces: &Array2<f64>) -> Array1<f64> {
    let mut total = Array1::zeros(3);
    for i in 0..forces.nrows() {
        for d in 0..3 {
            total[d] += forces[[i, d]];
        }
    }
    total
}

/// Spanwise sectional force distribution on a structured grid
///
/// `dims = [nchord, nspan]` with the chordwise index running fastest. For
/// every span station the panel forces are summed over the chord and divided
/// by the local span step: forward difference at the leading station,
/// backward at the trailing one, centered otherwise, with span positions
/// `s_j = mean_i(span_direction . CP_ij)`.
///
/// Returns `(span positions, force per unit span)`.
pub fn compute_sectional_force(
    forces: &Array2<f64>,
    control_points: &Array2<f64>,
    dims: [usize; 2],
    span_direction: &[f64; 3],
) -> Result<(Array1<f64>, Array2<f64>), PanelError> {
    let [nchord, nspan] = dims;
    if nchord * nspan != forces.nrows() {
        return Err(PanelError::ShapeMismatch {
            name: "F".to_string(),
            expected: (nchord * nspan, 3),
            actual: (forces.nrows(), forces.ncols()),
        });
    }
    if nspan < 2 {
        return Err(PanelError::InvalidParameters(
            "sectional force requires at least two span stations".to_string(),
        ));
    }

    let mut spans = Array1::zeros(nspan);
    let mut sums = Array2::<f64>::zeros((nspan, 3));

    for j in 0..nspan {
        let mut s = 0.0;
        for i in 0..nchord {
            let lin = i + nchord * j;
            s += span_direction[0] * control_points[[lin, 0]]
                + span_direction[1] * control_points[[lin, 1]]
                + span_direction[2] * control_points[[lin, 2]];
            for d in 0..3 {
                sums[[j, d]] += forces[[lin, d]];
            }
        }
        spans[j] = s / nchord as f64;
    }

    let mut sectional = Array2::zeros((nspan, 3));
    for j in 0..nspan {
        let ds = if j == 0 {
            spans[1] - spans[0]
        } else if j == nspan - 1 {
            spans[j] - spans[j - 1]
        } else {
            (spans[j + 1] - spans[j - 1]) / 2.0
        };
        for d in 0..3 {
            sectional[[j, d]] = sums[[j, d]] / ds;
        }
    }

    Ok((spans, sectional))
}

/// Check that a basis vector is unit length to within 2 ulps
fn check_unit(name: &str, v: &[f64; 3]) -> Result<(), PanelError> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if (norm - 1.0).abs() > 2.0 * f64::EPSILON {
        return Err(PanelError::NonUnitBasis {
            name: name.to_string(),
            norm,
        });
    }
    Ok(())
}

/// Decompose the total force onto lift/drag/sideslip axes
///
/// Returns a 3x3 matrix whose columns are the projections
/// `(F.L)L, (F.D)D, (F.S)S`. The sideslip axis defaults to `L x D`. Basis
/// vectors must be unit length to within 2 ulps.
pub fn decompose_lds(
    total_force: &Array1<f64>,
    lhat: &[f64; 3],
    dhat: &[f64; 3],
    shat: Option<&[f64; 3]>,
) -> Result<Array2<f64>, PanelError> {
    check_unit("Lhat", lhat)?;
    check_unit("Dhat", dhat)?;

    let cross = [
        lhat[1] * dhat[2] - lhat[2] * dhat[1],
        lhat[2] * dhat[0] - lhat[0] * dhat[2],
        lhat[0] * dhat[1] - lhat[1] * dhat[0],
    ];
    let shat = match shat {
        Some(s) => {
            check_unit("Shat", s)?;
            *s
        }
        None => cross,
    };

    let mut out = Array2::zeros((3, 3));
    for (col, axis) in [lhat, dhat, &shat].into_iter().enumerate() {
        let projection =
            total_force[0] * axis[0] + total_force[1] * axis[1] + total_force[2] * axis[2];
        for d in 0..3 {
            out[[d, col]] = projection * axis[d];
        }
    }
    Ok(out)
}

/// Read a required vector field from the body
fn require_vector_field(body: &LiftingBody, name: &str) -> Result<Array2<f64>, PanelError> {
    match &body.require_field(name)?.data {
        FieldData::Vector(m) => Ok(m.clone()),
        FieldData::Scalar(_) => Err(PanelError::MissingField(name.to_string())),
    }
}

/// Compute `Cp` from the `U` field and store it
pub fn add_pressure_field(body: &mut LiftingBody, u_ref: f64) -> Result<(), PanelError> {
    body.ensure_solved("Cp")?;
    let us = require_vector_field(body, "U")?;
    let cp = compute_pressure_coefficient(&us, u_ref);
    body.add_field("Cp", FieldData::Scalar(cp), FieldLocation::Cell);
    Ok(())
}

/// Compute per-panel forces from the `U` field and store them as `F`
pub fn add_force_field(body: &mut LiftingBody, rho: f64, u_inf: f64) -> Result<(), PanelError> {
    body.ensure_solved("F")?;
    let us = require_vector_field(body, "U")?;
    let areas = body.grid().calc_areas();
    let normals = body.calc_normals();
    let forces = compute_panel_forces(&us, &areas, &normals, rho, u_inf);
    body.add_field("F", FieldData::Vector(forces), FieldLocation::Cell);
    Ok(())
}

/// Compute the sectional force distribution from the `F` field and store it
/// as `sectionalforce`
///
/// Requires the grid to carry a structured layout.
pub fn add_sectional_force_field(
    body: &mut LiftingBody,
    span_direction: &[f64; 3],
) -> Result<(), PanelError> {
    body.ensure_solved("sectionalforce")?;
    let forces = require_vector_field(body, "F")?;
    let dims = body
        .grid()
        .grid_dims()
        .ok_or(PanelError::MissingGridStructure)?;

    let normals = body.calc_normals();
    let control_points = body.calc_control_points(&normals);
    let (_, sectional) = compute_sectional_force(&forces, &control_points, dims, span_direction)?;

    body.add_field(
        "sectionalforce",
        FieldData::Vector(sectional),
        FieldLocation::System,
    );
    Ok(())
}

/// Sum the `F` field into the total force and store it as `Ftot`
pub fn add_total_force_field(body: &mut LiftingBody) -> Result<(), PanelError> {
    body.ensure_solved("Ftot")?;
    let forces = require_vector_field(body, "F")?;
    let total = compute_total_force(&forces);
    let mut row = Array2::zeros((1, 3));
    for d in 0..3 {
        row[[0, d]] = total[d];
    }
    body.add_field("Ftot", FieldData::Vector(row), FieldLocation::System);
    Ok(())
}

/// Decompose the `Ftot` field and store the `L`, `D` and `S` components
pub fn add_lds_fields(
    body: &mut LiftingBody,
    lhat: &[f64; 3],
    dhat: &[f64; 3],
    shat: Option<&[f64; 3]>,
) -> Result<(), PanelError> {
    body.ensure_solved("L")?;
    let ftot = require_vector_field(body, "Ftot")?;
    let total = Array1::from_vec(vec![ftot[[0, 0]], ftot[[0, 1]], ftot[[0, 2]]]);

    let lds = decompose_lds(&total, lhat, dhat, shat)?;

    for (col, name) in ["L", "D", "S"].iter().enumerate() {
        let mut row = Array2::zeros((1, 3));
        for d in 0..3 {
            row[[0, d]] = lds[[d, col]];
        }
        body.add_field(name, FieldData::Vector(row), FieldLocation::System);
    }
    Ok(())
}
