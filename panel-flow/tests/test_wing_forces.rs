//! Full force pipeline on a rectangular wing
//!
//! Solve at an angle of attack, then walk the whole post-processing chain:
//! velocity, pressure coefficient, panel forces, sectional distribution,
//! total force and its lift/drag/sideslip decomposition.

use ndarray::Array2;

use panel_flow::core::mesh::generators::generate_wing_grid;
use panel_flow::core::postprocess::{
    add_force_field, add_lds_fields, add_pressure_field, add_sectional_force_field,
    add_total_force_field, add_velocity_field,
};
use panel_flow::{LiftingBody, PanelError, SingularityModel, SolveOptions};

const RHO: f64 = 1.225;
const U_INF: f64 = 1.0;
const ALPHA: f64 = 0.0872; // ~5 degrees

fn solved_wing() -> LiftingBody {
    let (grid, sheddings) = generate_wing_grid(3, 5, 1.0, 5.0);
    let nsh = sheddings.len();
    let mut body = LiftingBody::new(grid, SingularityModel::VortexRing, sheddings).unwrap();

    let n = body.num_panels();
    let freestream = [U_INF * ALPHA.cos(), 0.0, U_INF * ALPHA.sin()];

    let mut uinfs = Array2::zeros((n, 3));
    for i in 0..n {
        for d in 0..3 {
            uinfs[[i, d]] = freestream[d];
        }
    }

    let mut das = Array2::zeros((nsh, 3));
    let mut dbs = Array2::zeros((nsh, 3));
    for k in 0..nsh {
        for d in 0..3 {
            das[[k, d]] = freestream[d] / U_INF;
            dbs[[k, d]] = freestream[d] / U_INF;
        }
    }

    body.solve(&uinfs, &das, &dbs, &SolveOptions::new()).unwrap();
    body
}

#[test]
fn test_force_pipeline_and_identities() {
    let mut body = solved_wing();
    let n = body.num_panels();

    add_velocity_field(&mut body).unwrap();
    add_pressure_field(&mut body, U_INF).unwrap();
    add_force_field(&mut body, RHO, U_INF).unwrap();
    add_sectional_force_field(&mut body, &[0.0, 1.0, 0.0]).unwrap();
    add_total_force_field(&mut body).unwrap();

    let lhat = [-ALPHA.sin(), 0.0, ALPHA.cos()];
    let dhat = [ALPHA.cos(), 0.0, ALPHA.sin()];
    add_lds_fields(&mut body, &lhat, &dhat, None).unwrap();

    let names: Vec<_> = body.field_names().collect();
    assert_eq!(
        names,
        vec![
            "Uinf",
            "Gamma",
            "Da",
            "Db",
            "U",
            "Cp",
            "F",
            "sectionalforce",
            "Ftot",
            "L",
            "D",
            "S"
        ]
    );

    let cp = body
        .get_field("Cp")
        .unwrap()
        .data
        .as_scalar()
        .unwrap()
        .clone();
    let forces = body
        .get_field("F")
        .unwrap()
        .data
        .as_vector()
        .unwrap()
        .clone();
    let areas = body.grid().calc_areas();
    let normals = body.calc_normals();

    // F_i = -Cp_i 1/2 rho Uinf^2 A_i n_i when U_ref = U_inf
    let q = 0.5 * RHO * U_INF * U_INF;
    for i in 0..n {
        for d in 0..3 {
            let expected = -cp[i] * q * areas[i] * normals[[i, d]];
            assert!(
                (forces[[i, d]] - expected).abs() < 1e-12,
                "panel {} component {}: {} vs {}",
                i,
                d,
                forces[[i, d]],
                expected
            );
        }
    }

    // The wing at incidence produces a nonzero resultant
    let ftot = body
        .get_field("Ftot")
        .unwrap()
        .data
        .as_vector()
        .unwrap()
        .clone();
    let magnitude =
        (ftot[[0, 0]].powi(2) + ftot[[0, 1]].powi(2) + ftot[[0, 2]].powi(2)).sqrt();
    assert!(magnitude > 1e-8);

    // LDS closure: the three projections sum back to the total force
    let l = body.get_field("L").unwrap().data.as_vector().unwrap().clone();
    let d_ = body.get_field("D").unwrap().data.as_vector().unwrap().clone();
    let s = body.get_field("S").unwrap().data.as_vector().unwrap().clone();
    for d in 0..3 {
        let sum = l[[0, d]] + d_[[0, d]] + s[[0, d]];
        assert!(
            (sum - ftot[[0, d]]).abs() < 1e-12,
            "component {}: {} vs {}",
            d,
            sum,
            ftot[[0, d]]
        );
    }
}

#[test]
fn test_sectional_force_integrates_to_total() {
    let mut body = solved_wing();

    add_velocity_field(&mut body).unwrap();
    add_force_field(&mut body, RHO, U_INF).unwrap();
    add_total_force_field(&mut body).unwrap();

    let forces = body
        .get_field("F")
        .unwrap()
        .data
        .as_vector()
        .unwrap()
        .clone();
    let dims = body.grid().grid_dims().unwrap();
    let normals = body.calc_normals();
    let cps = body.calc_control_points(&normals);

    let (spans, sectional) = panel_flow::core::postprocess::compute_sectional_force(
        &forces,
        &cps,
        dims,
        &[0.0, 1.0, 0.0],
    )
    .unwrap();

    let ftot = body
        .get_field("Ftot")
        .unwrap()
        .data
        .as_vector()
        .unwrap()
        .clone();

    let nspan = dims[1];
    for d in 0..3 {
        let mut integrated = 0.0;
        for j in 0..nspan {
            let ds = if j == 0 {
                spans[1] - spans[0]
            } else if j == nspan - 1 {
                spans[j] - spans[j - 1]
            } else {
                (spans[j + 1] - spans[j - 1]) / 2.0
            };
            integrated += ds * sectional[[j, d]];
        }
        assert!(
            (integrated - ftot[[0, d]]).abs() < 1e-10,
            "component {}: {} vs {}",
            d,
            integrated,
            ftot[[0, d]]
        );
    }
}

#[test]
fn test_postprocessing_unsolved_body_is_an_error() {
    let (grid, sheddings) = generate_wing_grid(2, 2, 1.0, 2.0);
    let mut body = LiftingBody::new(grid, SingularityModel::VortexRing, sheddings).unwrap();

    let err = add_velocity_field(&mut body).unwrap_err();
    assert!(matches!(err, PanelError::UnsolvedBody { .. }));
    assert!(err.to_string().contains("solve()"));
}

#[test]
fn test_pressure_requires_velocity_field() {
    let mut body = solved_wing();

    let err = add_pressure_field(&mut body, U_INF).unwrap_err();
    match err {
        PanelError::MissingField(name) => assert_eq!(name, "U"),
        other => panic!("expected missing field, got {}", other),
    }
}
