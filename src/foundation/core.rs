use crate::foundation::error::{PrintError, PrintResult};

pub use kurbo::{Affine, Point, Vec2};

/// Opaque white, the background of every canvas and the fill for uncovered pixels.
pub const WHITE: image::Rgb<u8> = image::Rgb([255, 255, 255]);

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Non-empty size.
    pub fn new(width: u32, height: u32) -> PrintResult<Self> {
        if width == 0 || height == 0 {
            return Err(PrintError::invalid_input(format!(
                "pixel size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Pixel count.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Axis-aligned pixel box; `x`/`y` is the top-left corner in canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Box size without position.
    pub fn size(self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Whether the box lies inside a canvas of `outer` size.
    pub fn fits_within(self, outer: PixelSize) -> bool {
        self.right() <= u64::from(outer.width) && self.bottom() <= u64::from(outer.height)
    }

    /// Whether the two boxes share at least one pixel.
    pub fn overlaps(self, other: PixelRect) -> bool {
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
