use crate::{
    foundation::core::{PixelRect, PixelSize},
    foundation::error::{PrintError, PrintResult},
    foundation::math::{inches_to_px, units_to_px},
    layout::grid::{GridPlan, GridSlot},
    request::model::{PrintSpec, RenderMode},
};

/// Largest canvas edge the engine will allocate.
pub const MAX_CANVAS_SIDE_PX: u32 = 32_768;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Density and padding policy used to turn inches into pixels.
pub struct GeometryConfig {
    /// Pixels per inch in preview mode.
    pub preview_density: u32,
    /// Pixels per inch in final mode.
    pub final_density: u32,
    /// Edge padding in relative units (0.0625 in each).
    pub padding_units: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            preview_density: 150,
            final_density: 200,
            padding_units: 1.0,
        }
    }
}

impl GeometryConfig {
    /// Density for `mode`.
    pub fn density_for(&self, mode: RenderMode) -> u32 {
        match mode {
            RenderMode::Preview => self.preview_density,
            RenderMode::Final => self.final_density,
        }
    }

    /// Reject zero densities and negative padding.
    pub fn validate(&self) -> PrintResult<()> {
        if self.preview_density == 0 || self.final_density == 0 {
            return Err(PrintError::invalid_input("densities must be >= 1 px/in"));
        }
        if !self.padding_units.is_finite() || self.padding_units < 0.0 {
            return Err(PrintError::invalid_input(
                "padding_units must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Pixel geometry of one canvas. Immutable once computed.
pub struct CanvasGeometry {
    /// Canvas width including padding.
    pub width: u32,
    /// Canvas height including padding.
    pub height: u32,
    /// Pixels per inch used for every conversion.
    pub density: u32,
    /// Edge padding on all four sides.
    pub padding: u32,
    /// Gap between adjacent cells.
    pub spacing: u32,
    /// Base cell width.
    pub cell_width: u32,
    /// Base cell height.
    pub cell_height: u32,
}

impl CanvasGeometry {
    /// Canvas size.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel box for a grid slot, widened across spanned cells and the gaps between them.
    pub fn cell_box(&self, slot: &GridSlot) -> PixelRect {
        PixelRect {
            x: self.padding + slot.col * (self.cell_width + self.spacing),
            y: self.padding + slot.row * (self.cell_height + self.spacing),
            width: slot.span.cols * self.cell_width + (slot.span.cols - 1) * self.spacing,
            height: slot.span.rows * self.cell_height + (slot.span.rows - 1) * self.spacing,
        }
    }

    /// Boxes for every slot of `grid`, in input order.
    pub fn cell_boxes(&self, grid: &GridPlan) -> Vec<PixelRect> {
        grid.slots().iter().map(|s| self.cell_box(s)).collect()
    }
}

/// Compute canvas and cell pixel sizes with the default density/padding policy.
pub fn compute_geometry(
    spec: &PrintSpec,
    mode: RenderMode,
    spacing: f64,
    grid: &GridPlan,
) -> PrintResult<CanvasGeometry> {
    compute_geometry_with(spec, mode, spacing, grid, &GeometryConfig::default())
}

/// Compute canvas and cell pixel sizes.
///
/// The canvas is the print size in pixels plus padding on every edge. Cell sizes are truncated,
/// so a few pixels may remain unused at the right/bottom edges.
pub fn compute_geometry_with(
    spec: &PrintSpec,
    mode: RenderMode,
    spacing: f64,
    grid: &GridPlan,
    cfg: &GeometryConfig,
) -> PrintResult<CanvasGeometry> {
    spec.validate()?;
    cfg.validate()?;
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(PrintError::invalid_input(format!(
            "spacing must be finite and >= 0, got {spacing}"
        )));
    }

    let density = cfg.density_for(mode);
    let padding = units_to_px(cfg.padding_units, density);
    let spacing_px = units_to_px(spacing, density);
    let width = inches_to_px(spec.width, density) + 2.0 * padding;
    let height = inches_to_px(spec.height, density) + 2.0 * padding;

    let max = f64::from(MAX_CANVAS_SIDE_PX);
    if width > max || height > max || spacing_px > max {
        return Err(PrintError::invalid_input(format!(
            "canvas {width}x{height} px exceeds the {MAX_CANVAS_SIDE_PX} px limit"
        )));
    }

    let cols = f64::from(grid.cols);
    let rows = f64::from(grid.layout_rows());
    let cell_width = ((width - 2.0 * padding - spacing_px * (cols - 1.0)) / cols).floor();
    let cell_height = ((height - 2.0 * padding - spacing_px * (rows - 1.0)) / rows).floor();
    if cell_width <= 0.0 || cell_height <= 0.0 {
        return Err(PrintError::invalid_input(format!(
            "spacing {spacing} leaves no room for a {}x{} grid on a {}x{} in print",
            grid.cols,
            grid.layout_rows(),
            spec.width,
            spec.height
        )));
    }

    // All values are integral and below MAX_CANVAS_SIDE_PX here.
    Ok(CanvasGeometry {
        width: width as u32,
        height: height as u32,
        density,
        padding: padding as u32,
        spacing: spacing_px as u32,
        cell_width: cell_width as u32,
        cell_height: cell_height as u32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
