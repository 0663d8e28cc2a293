//! Surface grids and per-panel geometry

pub mod element;
pub mod generators;
pub mod grid;

pub use element::*;
pub use generators::*;
pub use grid::SurfaceGrid;
