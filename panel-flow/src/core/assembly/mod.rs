//! Influence-matrix assembly
//!
//! Dense collocation assembly of the no-flow-through system: one row per
//! control point, one column per panel, with trailing-edge wakes folded into
//! their shedding panels' columns and prescribed strengths reduced out of
//! the unknown set.

pub mod influence;

pub use influence::{
    InfluenceSystem, add_sheet_influence, apply_prescribed, build_ring_influence,
    normal_equations, reinject_prescribed,
};

#[cfg(feature = "parallel")]
pub use influence::build_ring_influence_parallel;
