//! Synchronous planning: which grid, and how many pixels per cell.

/// Canvas and cell pixel geometry.
pub mod geometry;
/// Grid shape and hero-cell placement.
pub mod grid;
