use anyhow::Context;
use image::RgbImage;

use crate::foundation::math::flatten_over_white;

/// Decode encoded image bytes into opaque RGB8, flattening any alpha over white.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbImage> {
    if bytes.is_empty() {
        anyhow::bail!("empty image payload");
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    if !dyn_img.color().has_alpha() {
        return Ok(dyn_img.into_rgb8());
    }

    let rgba = dyn_img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        rgb.extend_from_slice(&flatten_over_white(px.0));
    }
    RgbImage::from_raw(width, height, rgb).context("rebuild flattened rgb buffer")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
