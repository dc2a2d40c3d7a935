use image::{RgbImage, imageops};

use crate::{
    foundation::core::WHITE,
    foundation::error::{PrintError, PrintResult},
    layout::geometry::CanvasGeometry,
    render::transform::PositionedPatch,
};

/// Paint `patches` onto a white canvas sized by `geometry`.
///
/// Patches are stamped in slice order, which must match input order. A patch whose pixels do not
/// match its cell, or whose cell leaves the canvas, is an engine bug and fails the job.
#[tracing::instrument(skip_all, fields(width = geometry.width, height = geometry.height, patches = patches.len()))]
pub fn composite(
    geometry: &CanvasGeometry,
    patches: &[PositionedPatch],
) -> PrintResult<RgbImage> {
    let canvas_size = geometry.size();
    let mut canvas = RgbImage::from_pixel(canvas_size.width, canvas_size.height, WHITE);

    for (expected, patch) in patches.iter().enumerate() {
        if patch.index != expected {
            return Err(PrintError::internal(format!(
                "patch for image {} arrived at position {expected}",
                patch.index
            )));
        }
        if patch.pixels.dimensions() != (patch.cell.width, patch.cell.height) {
            return Err(PrintError::internal(format!(
                "patch {} is {}x{} but its cell is {}x{}",
                patch.index,
                patch.pixels.width(),
                patch.pixels.height(),
                patch.cell.width,
                patch.cell.height
            )));
        }
        if !patch.cell.fits_within(canvas_size) {
            return Err(PrintError::internal(format!(
                "cell for image {} at ({}, {}) leaves the {}x{} canvas",
                patch.index, patch.cell.x, patch.cell.y, canvas_size.width, canvas_size.height
            )));
        }

        imageops::replace(
            &mut canvas,
            &patch.pixels,
            i64::from(patch.cell.x),
            i64::from(patch.cell.y),
        );
    }

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
