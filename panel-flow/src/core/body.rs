//! Lifting body and solve orchestration
//!
//! A [`LiftingBody`] couples a surface grid with a singularity model, a
//! trailing-edge shedding table and per-panel strength storage. `solve`
//! assembles the no-flow-through system, solves it, and commits strengths,
//! result fields and the solved flag atomically at the end; post-processors
//! refuse to touch an unsolved body.

use ndarray::{Array1, Array2};

use crate::core::assembly::{
    add_sheet_influence, apply_prescribed, build_ring_influence, normal_equations,
    reinject_prescribed,
};
use crate::core::assembly::influence::checkerboard_sign;
use crate::core::fields::{FieldData, FieldEntry, FieldLocation, FieldStore};
use crate::core::mesh::SurfaceGrid;
use crate::core::mesh::element::point;
use panel_solvers::direct::lu_solve;

/// Tolerance for the geometric coincidence of shared trailing-edge nodes
const TE_COINCIDENCE_TOL: f64 = 1e-10;

/// A trailing-edge shedding record
///
/// The upper panel sheds from the edge `upper_edge[0] -> upper_edge[1]`.
/// For closed trailing edges the lower partner panel is given with its own
/// edge-node pair, which must coincide geometrically with the upper edge
/// (either node ordering). `None` marks an open (half) trailing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingEdge {
    /// Panel index shedding the wake
    pub upper_panel: usize,
    /// Node indices of the shedding edge on the upper panel
    pub upper_edge: [usize; 2],
    /// Optional lower partner: `(panel, edge nodes)`
    pub lower: Option<(usize, [usize; 2])>,
}

/// Singularity families carried by a body
///
/// Encoded as a tagged enumeration of solver strategies; `solve`, assembly
/// and the post-processors dispatch on the tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SingularityModel {
    /// One vortex ring per panel
    VortexRing,
    /// Vortex rings plus a body-wide uniform vortex sheet
    ///
    /// The sheet strength is one extra unknown occupying the prescribed
    /// ring's column; per-panel sheet strengths are the solved value scaled
    /// by these weights and the checkerboard sign.
    RingAndSheet {
        /// Weight of the tangential sheet component
        weight_tangent: f64,
        /// Weight of the oblique sheet component
        weight_oblique: f64,
    },
}

impl SingularityModel {
    /// Number of strength columns this model stores per panel
    pub fn num_families(&self) -> usize {
        match self {
            SingularityModel::VortexRing => 1,
            SingularityModel::RingAndSheet { .. } => 3,
        }
    }
}

/// Linear solver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverMethod {
    /// Direct LU factorization with partial pivoting
    #[default]
    Direct,
}

/// Options controlling a solve
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Prescribed strengths `(panel index, value)`, sorted by index
    ///
    /// At least one element must be prescribed for closed bodies, whose ring
    /// formulation has a one-dimensional null space (a uniform circulation
    /// shift leaves the normal velocity unchanged).
    pub prescribed: Vec<(usize, f64)>,
    /// Linear solver
    pub solver: SolverMethod,
    /// Log progress via `log::info!`
    pub verbose: bool,
}

impl SolveOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prescribed strengths
    pub fn with_prescribed(mut self, prescribed: Vec<(usize, f64)>) -> Self {
        self.prescribed = prescribed;
        self
    }

    /// Set the linear solver
    pub fn with_solver(mut self, solver: SolverMethod) -> Self {
        self.solver = solver;
        self
    }

    /// Enable progress logging
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Panel-method errors
#[derive(Debug, Clone)]
pub enum PanelError {
    /// An input array had the wrong shape
    ShapeMismatch {
        /// Name of the offending array
        name: String,
        /// Expected shape
        expected: (usize, usize),
        /// Actual shape
        actual: (usize, usize),
    },
    /// Post-processing was attempted on an unsolved body
    UnsolvedBody {
        /// The field the caller tried to compute
        field: String,
    },
    /// A required field was absent from the body
    MissingField(String),
    /// A basis vector was not of unit length
    NonUnitBasis {
        /// Axis name
        name: String,
        /// Offending norm
        norm: f64,
    },
    /// The shedding table failed validation
    InvalidTrailingEdge(String),
    /// Invalid parameters
    InvalidParameters(String),
    /// The structured grid layout needed by the operation is missing
    MissingGridStructure,
    /// Linear solver failure, surfaced unchanged
    SolverFailed(String),
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelError::ShapeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch for {}: expected ({}, {}), got ({}, {})",
                name, expected.0, expected.1, actual.0, actual.1
            ),
            PanelError::UnsolvedBody { field } => write!(
                f,
                "cannot compute {} on an unsolved body; call solve() first",
                field
            ),
            PanelError::MissingField(name) => write!(f, "required field {} is missing", name),
            PanelError::NonUnitBasis { name, norm } => {
                write!(f, "basis vector {} is not unit length (norm = {})", name, norm)
            }
            PanelError::InvalidTrailingEdge(msg) => write!(f, "invalid trailing edge: {}", msg),
            PanelError::InvalidParameters(msg) => write!(f, "invalid parameters: {}", msg),
            PanelError::MissingGridStructure => {
                write!(f, "operation requires a structured grid layout")
            }
            PanelError::SolverFailed(msg) => write!(f, "solver failed: {}", msg),
        }
    }
}

impl std::error::Error for PanelError {}

/// A lifting body: surface grid, singularity model, wake definition and
/// solved strengths
#[derive(Debug, Clone)]
pub struct LiftingBody {
    grid: SurfaceGrid,
    model: SingularityModel,
    sheddings: Vec<TrailingEdge>,
    strength: Array2<f64>,
    /// Body-to-world rotation (rows are the body axes)
    pub oaxis: Array2<f64>,
    /// Body origin in world coordinates
    pub origin: Array1<f64>,
    /// Control-point offset in characteristic lengths (sign selects the side)
    pub cp_offset: f64,
    /// Kernel regularization offset
    pub kernel_offset: f64,
    /// Kernel evaluation cutoff
    pub kernel_cutoff: f64,
    fields: FieldStore,
    solved: bool,
}

impl LiftingBody {
    /// Construct a body and validate its shedding table
    ///
    /// Fails with [`PanelError::InvalidTrailingEdge`] when a shedding record
    /// references out-of-range panels or nodes, or when the two edges of a
    /// closed trailing edge are not geometrically coincident.
    pub fn new(
        grid: SurfaceGrid,
        model: SingularityModel,
        sheddings: Vec<TrailingEdge>,
    ) -> Result<Self, PanelError> {
        check_trailing_edge(&grid, &sheddings)?;

        let strength = Array2::zeros((grid.num_cells(), model.num_families()));

        Ok(Self {
            grid,
            model,
            sheddings,
            strength,
            oaxis: Array2::eye(3),
            origin: Array1::zeros(3),
            cp_offset: 1e-14,
            kernel_offset: 1e-8,
            kernel_cutoff: 1e-14,
            fields: FieldStore::new(),
            solved: false,
        })
    }

    /// Set the control-point offset
    pub fn with_cp_offset(mut self, off: f64) -> Result<Self, PanelError> {
        if off == 0.0 {
            return Err(PanelError::InvalidParameters(
                "control-point offset must be nonzero".to_string(),
            ));
        }
        self.cp_offset = off;
        Ok(self)
    }

    /// Set the kernel regularization controls
    pub fn with_kernel_regularization(
        mut self,
        offset: f64,
        cutoff: f64,
    ) -> Result<Self, PanelError> {
        if offset <= 0.0 || cutoff <= 0.0 {
            return Err(PanelError::InvalidParameters(format!(
                "kernel offset and cutoff must be strictly positive, got {} and {}",
                offset, cutoff
            )));
        }
        self.kernel_offset = offset;
        self.kernel_cutoff = cutoff;
        Ok(self)
    }

    /// The surface grid
    pub fn grid(&self) -> &SurfaceGrid {
        &self.grid
    }

    /// The singularity model
    pub fn model(&self) -> SingularityModel {
        self.model
    }

    /// The shedding table
    pub fn sheddings(&self) -> &[TrailingEdge] {
        &self.sheddings
    }

    /// Number of panels
    pub fn num_panels(&self) -> usize {
        self.grid.num_cells()
    }

    /// Per-panel strengths, `(ncells, nfamilies)`; written only by `solve`
    pub fn strength(&self) -> &Array2<f64> {
        &self.strength
    }

    /// True once `solve` has completed
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Insert or overwrite a named field
    pub fn add_field(&mut self, name: &str, data: FieldData, location: FieldLocation) {
        self.fields.add_field(name, data, location);
    }

    /// Look up a named field
    pub fn get_field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get_field(name)
    }

    /// True if the named field exists
    pub fn check_field(&self, name: &str) -> bool {
        self.fields.check_field(name)
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.names()
    }

    /// Look up a field, failing with [`PanelError::MissingField`]
    pub(crate) fn require_field(&self, name: &str) -> Result<&FieldEntry, PanelError> {
        self.fields
            .get_field(name)
            .ok_or_else(|| PanelError::MissingField(name.to_string()))
    }

    /// Fail with [`PanelError::UnsolvedBody`] unless solved
    pub(crate) fn ensure_solved(&self, field: &str) -> Result<(), PanelError> {
        if self.solved {
            Ok(())
        } else {
            Err(PanelError::UnsolvedBody {
                field: field.to_string(),
            })
        }
    }

    /// Assembly normals: the grid's geometric normals, negated when the
    /// control points are offset to the interior side (negative `cp_offset`)
    pub fn calc_normals(&self) -> Array2<f64> {
        self.grid.calc_normals(self.cp_offset < 0.0)
    }

    /// Collocation points offset by `cp_offset` characteristic lengths
    pub fn calc_control_points(&self, normals: &Array2<f64>) -> Array2<f64> {
        self.grid.calc_control_points(normals, self.cp_offset)
    }

    /// Solve the no-flow-through system with the solver selected in
    /// `options`
    ///
    /// `uinfs` holds one freestream velocity per panel, `(ncells, 3)`;
    /// `das`/`dbs` hold one unit wake direction per shedding record,
    /// `(nsh, 3)`. On success the body transitions to the solved state with
    /// `Uinf`, `Gamma`, `Da` and `Db` fields populated; on failure it is
    /// left untouched.
    pub fn solve(
        &mut self,
        uinfs: &Array2<f64>,
        das: &Array2<f64>,
        dbs: &Array2<f64>,
        options: &SolveOptions,
    ) -> Result<(), PanelError> {
        match options.solver {
            SolverMethod::Direct => self.solve_inner(uinfs, das, dbs, options, |g, b| {
                lu_solve(g, b).map_err(|e| PanelError::SolverFailed(e.to_string()))
            }),
        }
    }

    /// Solve with a caller-supplied linear solver routine
    pub fn solve_with<F>(
        &mut self,
        uinfs: &Array2<f64>,
        das: &Array2<f64>,
        dbs: &Array2<f64>,
        options: &SolveOptions,
        solver: F,
    ) -> Result<(), PanelError>
    where
        F: Fn(&Array2<f64>, &Array1<f64>) -> Result<Array1<f64>, String>,
    {
        self.solve_inner(uinfs, das, dbs, options, |g, b| {
            solver(g, b).map_err(PanelError::SolverFailed)
        })
    }

    fn solve_inner<F>(
        &mut self,
        uinfs: &Array2<f64>,
        das: &Array2<f64>,
        dbs: &Array2<f64>,
        options: &SolveOptions,
        solver: F,
    ) -> Result<(), PanelError>
    where
        F: Fn(&Array2<f64>, &Array1<f64>) -> Result<Array1<f64>, PanelError>,
    {
        let n = self.num_panels();
        let nsh = self.sheddings.len();

        check_shape("Uinfs", uinfs, (n, 3))?;
        check_shape("Das", das, (nsh, 3))?;
        check_shape("Dbs", dbs, (nsh, 3))?;

        if options.verbose {
            log::info!(
                "Solving lifting body: {} panels, {} shedding edges, {} prescribed",
                n,
                nsh,
                options.prescribed.len()
            );
        }

        for &(idx, _) in &options.prescribed {
            if idx >= n {
                return Err(PanelError::InvalidParameters(format!(
                    "prescribed panel index {} out of range ({} panels)",
                    idx, n
                )));
            }
        }

        let normals = self.calc_normals();
        let control_points = self.calc_control_points(&normals);

        let system = build_ring_influence(
            &self.grid,
            &self.sheddings,
            das,
            dbs,
            &control_points,
            &normals,
            uinfs,
            self.kernel_offset,
            self.kernel_cutoff,
        );

        let strength = match self.model {
            SingularityModel::VortexRing => {
                let gammas = if options.prescribed.is_empty() {
                    solver(&system.matrix, &system.rhs)?
                } else {
                    let (reduced, rhs, kept) = apply_prescribed(&system, &options.prescribed);
                    let (gls, bls) = normal_equations(&reduced, &rhs);
                    let solution = solver(&gls, &bls)?;
                    reinject_prescribed(&solution, &options.prescribed, &kept, n)
                };

                let mut strength = Array2::zeros((n, 1));
                for i in 0..n {
                    strength[[i, 0]] = gammas[i];
                }
                strength
            }
            SingularityModel::RingAndSheet {
                weight_tangent,
                weight_oblique,
            } => {
                if options.prescribed.len() != 1 {
                    return Err(PanelError::InvalidParameters(format!(
                        "the ring+sheet model requires exactly one prescribed element, got {}",
                        options.prescribed.len()
                    )));
                }
                let (pivot, pivot_value) = options.prescribed[0];

                // Move the prescribed ring column to the RHS and hand its
                // column over to the sheet unknown
                let mut matrix = system.matrix;
                let mut rhs = system.rhs;
                for i in 0..n {
                    rhs[i] -= matrix[[i, pivot]] * pivot_value;
                    matrix[[i, pivot]] = 0.0;
                }
                add_sheet_influence(
                    &self.grid,
                    &control_points,
                    &normals,
                    pivot,
                    (weight_tangent, weight_oblique),
                    &mut matrix,
                    self.kernel_offset,
                    self.kernel_cutoff,
                );

                let solution = solver(&matrix, &rhs)?;
                let sheet_gamma = solution[pivot];

                let mut strength = Array2::zeros((n, 3));
                for i in 0..n {
                    strength[[i, 0]] = if i == pivot { pivot_value } else { solution[i] };
                    let sign = checkerboard_sign(i);
                    strength[[i, 1]] = sign * sheet_gamma * weight_tangent;
                    strength[[i, 2]] = sign * sheet_gamma * weight_oblique;
                }
                strength
            }
        };

        // Commit: strengths, fields and flag change together only after
        // every fallible step has succeeded
        let gammas = strength.column(0).to_owned();
        self.strength = strength;
        self.fields
            .add_field("Uinf", FieldData::Vector(uinfs.clone()), FieldLocation::Cell);
        self.fields
            .add_field("Gamma", FieldData::Scalar(gammas), FieldLocation::Cell);
        self.fields
            .add_field("Da", FieldData::Vector(das.clone()), FieldLocation::System);
        self.fields
            .add_field("Db", FieldData::Vector(dbs.clone()), FieldLocation::System);
        self.solved = true;

        if options.verbose {
            log::info!("Solve complete: {} strength columns", self.strength.ncols());
        }

        Ok(())
    }
}

/// Validate an input array shape
fn check_shape(name: &str, array: &Array2<f64>, expected: (usize, usize)) -> Result<(), PanelError> {
    let actual = (array.nrows(), array.ncols());
    if actual != expected {
        return Err(PanelError::ShapeMismatch {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate a shedding table against its grid
///
/// Checks index ranges and, for closed trailing edges, that the upper and
/// lower edges coincide geometrically within tolerance (either node
/// ordering is accepted).
pub fn check_trailing_edge(
    grid: &SurfaceGrid,
    sheddings: &[TrailingEdge],
) -> Result<(), PanelError> {
    let ncells = grid.num_cells();
    let nnodes = grid.num_nodes();

    for (k, te) in sheddings.iter().enumerate() {
        if te.upper_panel >= ncells {
            return Err(PanelError::InvalidTrailingEdge(format!(
                "record {}: upper panel {} out of range ({} panels)",
                k, te.upper_panel, ncells
            )));
        }
        for &node in &te.upper_edge {
            if node >= nnodes {
                return Err(PanelError::InvalidTrailingEdge(format!(
                    "record {}: upper edge node {} out of range ({} nodes)",
                    k, node, nnodes
                )));
            }
        }

        if let Some((panel, edge)) = te.lower {
            if panel >= ncells {
                return Err(PanelError::InvalidTrailingEdge(format!(
                    "record {}: lower panel {} out of range ({} panels)",
                    k, panel, ncells
                )));
            }
            for &node in &edge {
                if node >= nnodes {
                    return Err(PanelError::InvalidTrailingEdge(format!(
                        "record {}: lower edge node {} out of range ({} nodes)",
                        k, node, nnodes
                    )));
                }
            }

            let ua = point(&grid.nodes, te.upper_edge[0]);
            let ub = point(&grid.nodes, te.upper_edge[1]);
            let la = point(&grid.nodes, edge[0]);
            let lb = point(&grid.nodes, edge[1]);

            let direct = distance(&ua, &la).max(distance(&ub, &lb));
            let crossed = distance(&ua, &lb).max(distance(&ub, &la));
            if direct.min(crossed) > TE_COINCIDENCE_TOL {
                return Err(PanelError::InvalidTrailingEdge(format!(
                    "record {}: upper and lower edges are not coincident (gap {:.3e})",
                    k,
                    direct.min(crossed)
                )));
            }
        }
    }

    Ok(())
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
