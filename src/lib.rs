//! Printboard composites an ordered set of photos into a single print-ready raster.
//!
//! A job is a [`LayoutRequest`]: image locators, a physical print size, spacing, fit mode, and a
//! preview/final flag. The engine plans a grid, computes pixel geometry for the target density,
//! fetches and transforms every image concurrently, stamps the patches onto a white canvas, and
//! encodes the result.
//!
//! - Build a [`PrintEngine`] with an [`EngineConfig`] and an [`ImageFetcher`]
//! - Call [`PrintEngine::run`] per request
//! - Hand the returned [`CompositeResult`] bytes to storage
//!
//! Jobs are all-or-nothing: any failure yields a [`PrintError`] and no artifact.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Byte fetching and image decoding.
pub mod assets;
/// Artifact encoding.
pub mod encode;
/// Shared primitives.
pub mod foundation;
/// Engine configuration and job orchestration.
pub mod job;
/// Grid planning and pixel geometry.
pub mod layout;
/// Per-image transforms and compositing.
pub mod render;
/// Request model.
pub mod request;

pub use crate::assets::fetch::{FetchFailure, FileFetcher, ImageFetcher, MemoryFetcher};
#[cfg(feature = "http")]
pub use crate::assets::fetch::{HttpFetcher, HttpFetcherConfig, RoutingFetcher};
pub use crate::encode::jpeg::{ArtifactFormat, CompositeResult, Disposition, Variant};
pub use crate::foundation::core::{PixelRect, PixelSize};
pub use crate::foundation::error::{ErrorReport, PrintError, PrintResult};
pub use crate::job::config::EngineConfig;
pub use crate::job::orchestrator::{JobOutput, JobRun, JobState, PrintEngine, compose};
pub use crate::layout::geometry::{CanvasGeometry, GeometryConfig, compute_geometry};
pub use crate::layout::grid::{CellSpan, GridPlan, GridSlot, plan};
pub use crate::request::model::{
    FitMode, ImageRef, LayoutRequest, Orientation, PRINT_PRESETS, PrintPreset, PrintSpec,
    RenderMode,
};
