//! Per-image processing and canvas assembly.
//!
//! Acquisition runs concurrently on a rayon pool; compositing runs on the calling thread after
//! every patch is ready.

/// Concurrent fetch/decode/transform stage.
pub mod acquire;
/// Canvas assembly.
pub mod composite;
/// Rotation and fit.
pub mod transform;
