use std::path::Path;

use anyhow::Context;

use crate::{
    encode::jpeg::EncodeSettings,
    foundation::error::{PrintError, PrintResult},
    layout::geometry::GeometryConfig,
};

/// Engine-wide knobs. Every field has a default, so a partial JSON document is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Acquisition worker count. `None` lets rayon pick; `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Density and padding policy.
    #[serde(flatten)]
    pub geometry: GeometryConfig,
    /// JPEG quality of preview jobs.
    pub preview_quality: u8,
    /// JPEG quality of the print artifact.
    pub final_quality: u8,
    /// JPEG quality of the display copy that accompanies a print artifact.
    pub display_quality: u8,
    /// Long-side cap for the display copy.
    pub display_max_side_px: u32,
    /// DPI tag for the print artifact. Defaults to the final density.
    pub print_dpi: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: None,
            geometry: GeometryConfig::default(),
            preview_quality: 80,
            final_quality: 90,
            display_quality: 75,
            display_max_side_px: 2048,
            print_dpi: None,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PrintResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> PrintResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PrintError::invalid_input(format!("malformed engine config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> PrintResult<()> {
        if self.threads == Some(0) {
            return Err(PrintError::invalid_input(
                "worker 'threads' must be >= 1 when set",
            ));
        }
        self.geometry.validate()?;
        for (name, q) in [
            ("preview_quality", self.preview_quality),
            ("final_quality", self.final_quality),
            ("display_quality", self.display_quality),
        ] {
            if !(1..=100).contains(&q) {
                return Err(PrintError::invalid_input(format!(
                    "{name} must be in 1..=100, got {q}"
                )));
            }
        }
        if self.display_max_side_px == 0 {
            return Err(PrintError::invalid_input("display_max_side_px must be >= 1"));
        }
        if self.print_dpi == Some(0) {
            return Err(PrintError::invalid_input("print_dpi must be >= 1 when set"));
        }
        Ok(())
    }

    /// DPI written into the print artifact.
    pub fn effective_print_dpi(&self) -> u16 {
        self.print_dpi
            .unwrap_or_else(|| u16::try_from(self.geometry.final_density).unwrap_or(u16::MAX))
    }

    /// Encoder settings for a preview job.
    pub fn preview_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.preview_quality,
            dpi: None,
        }
    }

    /// Encoder settings for the print artifact.
    pub fn print_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.final_quality,
            dpi: Some(self.effective_print_dpi()),
        }
    }

    /// Encoder settings for the display copy of a final job.
    pub fn display_settings(&self) -> EncodeSettings {
        EncodeSettings {
            quality: self.display_quality,
            dpi: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/config.rs"]
mod tests;
