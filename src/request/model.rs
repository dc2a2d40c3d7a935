use crate::foundation::error::{PrintError, PrintResult};

/// Default gap between cells, in relative units.
pub const DEFAULT_SPACING: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How an image is sized into its cell.
pub enum FitMode {
    /// Fill the cell, cropping overflow around the centre.
    #[default]
    Cover,
    /// Fit entirely inside the cell, padding the remainder with white.
    Contain,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Output resolution and quality policy.
pub enum RenderMode {
    /// Screen preview: lower density, single artifact.
    Preview,
    /// Print production: higher density, print + display artifacts.
    #[default]
    Final,
}

impl RenderMode {
    /// Map the storefront's `isPreview` flag.
    pub fn from_preview_flag(preview: bool) -> Self {
        if preview { Self::Preview } else { Self::Final }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Final => "final",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Paper orientation applied to the print size before layout.
///
/// Orientation is relative to the print size as given, not to its short/long edges.
pub enum Orientation {
    /// Use the print width and height as given.
    #[default]
    Portrait,
    /// Swap the print width and height.
    Landscape,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Physical print size in inches.
pub struct PrintSpec {
    /// Width in inches.
    pub width: f64,
    /// Height in inches.
    pub height: f64,
    /// Unit price. Carried through, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Preset name such as `8.5x11`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PrintSpec {
    /// Build a validated, unnamed print size.
    pub fn new(width: f64, height: f64) -> PrintResult<Self> {
        let spec = Self {
            width,
            height,
            price: None,
            name: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Look up a storefront preset by name (see [`PRINT_PRESETS`]).
    pub fn preset(name: &str) -> PrintResult<Self> {
        PRINT_PRESETS
            .iter()
            .find(|p| p.name == name)
            .map(PrintPreset::to_spec)
            .ok_or_else(|| PrintError::invalid_input(format!("unknown print size preset '{name}'")))
    }

    /// Reject non-finite or non-positive dimensions.
    pub fn validate(&self) -> PrintResult<()> {
        for (axis, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PrintError::invalid_input(format!(
                    "print {axis} must be finite and > 0 inches, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Return a copy laid out for `orientation`: unchanged for portrait, swapped for landscape.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => self.clone(),
            Orientation::Landscape => Self {
                width: self.height,
                height: self.width,
                ..self.clone()
            },
        }
    }

    /// Short label used in file names, e.g. `8.5x11`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => format!("{}x{}", self.width, self.height),
        }
    }
}

/// Named storefront print size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrintPreset {
    /// Preset name.
    pub name: &'static str,
    /// Width in inches.
    pub width: f64,
    /// Height in inches.
    pub height: f64,
}

impl PrintPreset {
    /// Convert into a named [`PrintSpec`].
    pub fn to_spec(&self) -> PrintSpec {
        PrintSpec {
            width: self.width,
            height: self.height,
            price: None,
            name: Some(self.name.to_string()),
        }
    }
}

/// Print sizes offered by the storefront.
pub const PRINT_PRESETS: &[PrintPreset] = &[
    PrintPreset {
        name: "5x7",
        width: 5.0,
        height: 7.0,
    },
    PrintPreset {
        name: "8.5x11",
        width: 8.5,
        height: 11.0,
    },
    PrintPreset {
        name: "11x14",
        width: 11.0,
        height: 14.0,
    },
    PrintPreset {
        name: "12x18",
        width: 12.0,
        height: 18.0,
    },
];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One source image and its per-image options.
pub struct ImageRef {
    /// Source locator (`https://`, `file://`, plain path, or `data:` URI).
    pub url: String,
    /// Clockwise rotation in degrees; any finite value.
    #[serde(default)]
    pub rotation: f64,
    /// Overrides the request-level fit mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitMode>,
    /// Alt text, used for diagnostics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageRef {
    /// Unrotated reference with no fit override.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            rotation: 0.0,
            fit: None,
            alt: None,
        }
    }

    /// Set rotation in degrees.
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set a per-image fit override.
    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = Some(fit);
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single compositing job: ordered images plus layout parameters.
///
/// Field names are snake_case; the storefront's camelCase spellings are accepted as aliases.
pub struct LayoutRequest {
    /// Images in display order. Must be non-empty.
    pub images: Vec<ImageRef>,
    /// Physical print size.
    #[serde(alias = "printSize")]
    pub print_size: PrintSpec,
    /// Gap between cells, in relative units (0.0625 in each).
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// `true` selects [`FitMode::Contain`] as the default; otherwise cover.
    #[serde(default, alias = "containMode")]
    pub contain: bool,
    /// `true` selects [`RenderMode::Preview`].
    #[serde(default, alias = "isPreview")]
    pub preview: bool,
    /// Paper orientation. `None` uses the print size as given.
    #[serde(
        default,
        alias = "isPortrait",
        deserialize_with = "deserialize_orientation",
        skip_serializing_if = "Option::is_none"
    )]
    pub orientation: Option<Orientation>,
    /// Corner rounding radius for every cell, in relative units (0.0625 in each).
    #[serde(default, alias = "cornerRounding")]
    pub corner_radius: f64,
}

fn default_spacing() -> f64 {
    DEFAULT_SPACING
}

fn deserialize_orientation<'de, D>(de: D) -> Result<Option<Orientation>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Named(Orientation),
        IsPortrait(bool),
    }

    Ok(
        <Option<Raw> as serde::Deserialize>::deserialize(de)?.map(|raw| match raw {
            Raw::Named(o) => o,
            Raw::IsPortrait(true) => Orientation::Portrait,
            Raw::IsPortrait(false) => Orientation::Landscape,
        }),
    )
}

impl LayoutRequest {
    /// Request with default spacing, cover fit, final mode, square corners and the print size
    /// as given.
    pub fn new(images: Vec<ImageRef>, print_size: PrintSpec) -> Self {
        Self {
            images,
            print_size,
            spacing: DEFAULT_SPACING,
            contain: false,
            preview: false,
            orientation: None,
            corner_radius: 0.0,
        }
    }

    /// Parse a JSON request document.
    pub fn from_json(json: &str) -> PrintResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PrintError::invalid_input(format!("malformed layout request: {e}")))
    }

    /// Requested render mode.
    pub fn mode(&self) -> RenderMode {
        RenderMode::from_preview_flag(self.preview)
    }

    /// Request-level fit mode.
    pub fn default_fit(&self) -> FitMode {
        if self.contain {
            FitMode::Contain
        } else {
            FitMode::Cover
        }
    }

    /// Fit mode for image `index`, honouring per-image overrides.
    pub fn fit_for(&self, index: usize) -> FitMode {
        self.images
            .get(index)
            .and_then(|i| i.fit)
            .unwrap_or_else(|| self.default_fit())
    }

    /// Print size after orientation is applied.
    pub fn effective_print_spec(&self) -> PrintSpec {
        match self.orientation {
            Some(orientation) => self.print_size.oriented(orientation),
            None => self.print_size.clone(),
        }
    }

    /// Shape checks that need no I/O.
    pub fn validate(&self) -> PrintResult<()> {
        if self.images.is_empty() {
            return Err(PrintError::invalid_input("No images provided"));
        }
        self.print_size.validate()?;
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(PrintError::invalid_input(format!(
                "spacing must be finite and >= 0, got {}",
                self.spacing
            )));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(PrintError::invalid_input(format!(
                "corner radius must be finite and >= 0, got {}",
                self.corner_radius
            )));
        }
        for (idx, img) in self.images.iter().enumerate() {
            if img.url.trim().is_empty() {
                return Err(PrintError::invalid_input(format!(
                    "image {idx} has an empty source locator"
                )));
            }
            if !img.rotation.is_finite() {
                return Err(PrintError::invalid_input(format!(
                    "image {idx} rotation must be finite"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
