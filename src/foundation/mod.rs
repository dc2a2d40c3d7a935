//! Shared primitives: pixel types, error taxonomy, unit math.

/// Pixel sizes and boxes.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
