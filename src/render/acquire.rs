use image::imageops::FilterType;
use rayon::prelude::*;

use crate::{
    assets::decode::decode_image,
    assets::fetch::ImageFetcher,
    foundation::core::PixelRect,
    foundation::error::{PrintError, PrintResult},
    render::transform::{PositionedPatch, build_patch},
    request::model::{FitMode, ImageRef},
};

/// One unit of work for the acquisition stage.
#[derive(Clone, Debug)]
pub struct AcquireTask<'a> {
    /// Index of the image in the request.
    pub index: usize,
    /// Source reference and per-image options.
    pub image: &'a ImageRef,
    /// Target canvas box, span-adjusted.
    pub cell: PixelRect,
    /// Resolved fit mode.
    pub fit: FitMode,
    /// Corner rounding radius in canvas pixels. Zero keeps square corners.
    pub corner_radius_px: u32,
}

/// Fetch, decode, rotate, and fit a single image.
#[tracing::instrument(skip(task, fetcher, filter), fields(index = task.index, uri = %task.image.url))]
pub fn acquire_one(
    task: &AcquireTask<'_>,
    fetcher: &dyn ImageFetcher,
    filter: FilterType,
) -> PrintResult<PositionedPatch> {
    let uri = task.image.url.as_str();
    let bytes = fetcher.fetch(uri).map_err(|e| {
        tracing::warn!(error = %e, "image fetch failed");
        PrintError::fetch(task.index, uri, e.to_string())
    })?;

    let decoded = decode_image(&bytes).map_err(|e| {
        tracing::warn!(error = %format!("{e:#}"), "image decode failed");
        PrintError::decode(task.index, uri, format!("{e:#}"))
    })?;
    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        "decoded source image"
    );

    Ok(build_patch(
        task.index,
        &decoded,
        task.image.rotation,
        task.cell,
        task.fit,
        filter,
        task.corner_radius_px,
    ))
}

/// Run every task on `pool` and join.
///
/// Patches come back in task order regardless of completion order. The first failure wins;
/// remaining tasks are skipped where rayon has not started them yet, and any finished patches
/// are dropped.
pub fn acquire_patches(
    tasks: &[AcquireTask<'_>],
    fetcher: &dyn ImageFetcher,
    filter: FilterType,
    pool: &rayon::ThreadPool,
) -> PrintResult<Vec<PositionedPatch>> {
    let patches = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| acquire_one(task, fetcher, filter))
            .collect::<PrintResult<Vec<_>>>()
    })?;

    if patches
        .iter()
        .zip(tasks)
        .any(|(patch, task)| patch.index != task.index)
    {
        return Err(PrintError::internal(
            "acquisition join returned patches out of input order",
        ));
    }
    Ok(patches)
}

/// Build the worker pool for the acquisition stage.
pub fn build_thread_pool(threads: Option<usize>) -> PrintResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PrintError::invalid_input(
            "worker 'threads' must be >= 1 when set",
        ));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("printboard-acquire-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PrintError::internal(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/acquire.rs"]
mod tests;
