use image::{RgbImage, imageops, imageops::FilterType};

use crate::{
    foundation::core::{Affine, PixelRect, PixelSize, Point, Vec2, WHITE},
    request::model::{FitMode, RenderMode},
};

const ANGLE_EPS: f64 = 1e-9;

/// A fully processed image, sized to its cell and positioned on the canvas.
#[derive(Clone, Debug)]
pub struct PositionedPatch {
    /// Index of the source image in the request.
    pub index: usize,
    /// Canvas box the patch covers. `pixels` has exactly this size.
    pub cell: PixelRect,
    /// Opaque RGB pixels.
    pub pixels: RgbImage,
}

/// Resampling filter for `mode`. Preview favours speed, final favours sharpness.
pub fn filter_for(mode: RenderMode) -> FilterType {
    match mode {
        RenderMode::Preview => FilterType::Triangle,
        RenderMode::Final => FilterType::Lanczos3,
    }
}

/// Rotate, fit, round the corners of, and position one decoded image.
pub fn build_patch(
    index: usize,
    decoded: &RgbImage,
    rotation_deg: f64,
    cell: PixelRect,
    fit: FitMode,
    filter: FilterType,
    corner_radius_px: u32,
) -> PositionedPatch {
    let rotated = rotate_image(decoded, rotation_deg);
    let mut pixels = fit_to_box(&rotated, cell.size(), fit, filter);
    round_corners(&mut pixels, corner_radius_px);
    PositionedPatch {
        index,
        cell,
        pixels,
    }
}

/// Rotate clockwise by `degrees` about the image centre.
///
/// The output grows to the rotated bounding box; uncovered corners are white. Quarter turns are
/// lossless.
pub fn rotate_image(img: &RgbImage, degrees: f64) -> RgbImage {
    let deg = degrees.rem_euclid(360.0);
    if deg < ANGLE_EPS || 360.0 - deg < ANGLE_EPS {
        return img.clone();
    }
    if (deg - 90.0).abs() < ANGLE_EPS {
        return imageops::rotate90(img);
    }
    if (deg - 180.0).abs() < ANGLE_EPS {
        return imageops::rotate180(img);
    }
    if (deg - 270.0).abs() < ANGLE_EPS {
        return imageops::rotate270(img);
    }
    rotate_arbitrary(img, deg.to_radians())
}

fn rotate_arbitrary(img: &RgbImage, theta: f64) -> RgbImage {
    let (w, h) = (f64::from(img.width()), f64::from(img.height()));
    let (sin, cos) = theta.sin_cos();
    let out_w = (w * cos.abs() + h * sin.abs()).ceil().max(1.0);
    let out_h = (w * sin.abs() + h * cos.abs()).ceil().max(1.0);

    // Destination pixel centre -> source position.
    let to_src = Affine::translate(Vec2::new(w * 0.5, h * 0.5))
        * Affine::rotate(-theta)
        * Affine::translate(Vec2::new(-out_w * 0.5, -out_h * 0.5));

    let mut out = RgbImage::from_pixel(out_w as u32, out_h as u32, WHITE);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = to_src * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        *px = image::Rgb(sample_bilinear_on_white(img, p.x - 0.5, p.y - 0.5));
    }
    out
}

/// Bilinear sample where texels outside the image read as white, so edges blend into the fill.
fn sample_bilinear_on_white(img: &RgbImage, fx: f64, fy: f64) -> [u8; 3] {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    if x0 + 1 < 0 || y0 + 1 < 0 || x0 >= w || y0 >= h {
        return WHITE.0;
    }

    let texel = |x: i64, y: i64| -> [f64; 3] {
        if x < 0 || y < 0 || x >= w || y >= h {
            return [255.0; 3];
        }
        let p = img.get_pixel(x as u32, y as u32).0;
        [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]
    };

    let (a, b, c, d) = (
        texel(x0, y0),
        texel(x0 + 1, y0),
        texel(x0, y0 + 1),
        texel(x0 + 1, y0 + 1),
    );
    let mut out = [0u8; 3];
    for i in 0..3 {
        let top = a[i] + (b[i] - a[i]) * tx;
        let bottom = c[i] + (d[i] - c[i]) * tx;
        out[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Resize `img` to exactly `size` under `fit`.
///
/// `Cover` crops the source to the box aspect around the centre, then scales the crop. `Contain`
/// scales to fit, centres, and pads with white.
pub fn fit_to_box(img: &RgbImage, size: PixelSize, fit: FitMode, filter: FilterType) -> RgbImage {
    let (iw, ih) = img.dimensions();
    let (tw, th) = (size.width, size.height);
    let sx = f64::from(tw) / f64::from(iw);
    let sy = f64::from(th) / f64::from(ih);

    match fit {
        FitMode::Cover => {
            let crop = cover_crop(img.dimensions(), (tw, th));
            let cropped = imageops::crop_imm(img, crop.x, crop.y, crop.width, crop.height);
            resize_if_needed(&cropped.to_image(), tw, th, filter)
        }
        FitMode::Contain => {
            let scale = sx.min(sy);
            let sw = ((f64::from(iw) * scale).round() as u32).clamp(1, tw);
            let sh = ((f64::from(ih) * scale).round() as u32).clamp(1, th);
            let scaled = resize_if_needed(img, sw, sh, filter);
            let mut out = RgbImage::from_pixel(tw, th, WHITE);
            imageops::replace(
                &mut out,
                &scaled,
                i64::from((tw - sw) / 2),
                i64::from((th - sh) / 2),
            );
            out
        }
    }
}

/// Largest centred source rect with the aspect ratio of `target`.
fn cover_crop((iw, ih): (u32, u32), (tw, th): (u32, u32)) -> PixelRect {
    let (iw64, ih64, tw64, th64) = (
        u64::from(iw),
        u64::from(ih),
        u64::from(tw.max(1)),
        u64::from(th.max(1)),
    );
    let (width, height) = if iw64 * th64 > tw64 * ih64 {
        let w = ((ih64 * tw64 + th64 / 2) / th64).clamp(1, iw64);
        (w as u32, ih)
    } else {
        let h = ((iw64 * th64 + tw64 / 2) / tw64).clamp(1, ih64);
        (iw, h as u32)
    };
    PixelRect {
        x: (iw - width) / 2,
        y: (ih - height) / 2,
        width,
        height,
    }
}

/// Paint white every pixel outside a quarter circle of `radius` in each corner.
///
/// The radius is clamped to half the shorter side; zero leaves the image untouched.
pub fn round_corners(img: &mut RgbImage, radius: u32) {
    let (w, h) = img.dimensions();
    let r = radius.min(w / 2).min(h / 2);
    if r == 0 {
        return;
    }
    let rf = f64::from(r);
    for y in 0..r {
        for x in 0..r {
            let dx = rf - (f64::from(x) + 0.5);
            let dy = rf - (f64::from(y) + 0.5);
            if dx * dx + dy * dy <= rf * rf {
                continue;
            }
            img.put_pixel(x, y, WHITE);
            img.put_pixel(w - 1 - x, y, WHITE);
            img.put_pixel(x, h - 1 - y, WHITE);
            img.put_pixel(w - 1 - x, h - 1 - y, WHITE);
        }
    }
}

fn resize_if_needed(img: &RgbImage, w: u32, h: u32, filter: FilterType) -> RgbImage {
    if img.dimensions() == (w, h) {
        img.clone()
    } else {
        imageops::resize(img, w, h, filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
