use std::io::Cursor;

use image::{
    RgbImage,
    codecs::jpeg::{JpegEncoder, PixelDensity},
    imageops,
};

use crate::{
    foundation::error::{PrintError, PrintResult},
    foundation::math::Fnv1a64,
    request::model::{PrintSpec, RenderMode},
};

/// Declared container format of an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    /// Baseline JPEG with a JFIF header.
    Jpeg,
}

impl ArtifactFormat {
    /// IANA media type.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
        }
    }
}

/// Which deliverable an artifact is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single artifact of a preview job.
    Preview,
    /// Print-grade artifact of a final job.
    Print,
    /// Lower-fidelity display copy of a final job.
    DisplayPreview,
}

/// How a downstream server should present the artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Render in place.
    Inline,
    /// Offer as a download.
    Attachment,
}

/// Parameters for one JPEG pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeSettings {
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// JFIF density tag in dots per inch. `None` leaves the encoder's aspect-ratio default.
    pub dpi: Option<u16>,
}

/// An encoded deliverable. Ownership passes to the caller.
#[derive(Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompositeResult {
    /// Encoded bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Container format.
    pub format: ArtifactFormat,
    /// Mode of the job that produced it.
    pub mode: RenderMode,
    /// Which deliverable this is.
    pub variant: Variant,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Density tag written into the file, if any.
    pub dpi: Option<u16>,
    /// Presentation hint.
    pub disposition: Disposition,
    /// Suggested download name.
    pub file_name: String,
    /// FNV-1a 64 hash of `bytes`, for dedupe and determinism checks.
    pub fingerprint: u64,
}

impl std::fmt::Debug for CompositeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeResult")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("format", &self.format)
            .field("mode", &self.mode)
            .field("variant", &self.variant)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpi", &self.dpi)
            .field("disposition", &self.disposition)
            .field("file_name", &self.file_name)
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint))
            .finish()
    }
}

impl CompositeResult {
    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty. Never true for engine output.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// IANA media type of `bytes`.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Encode an RGB canvas as JPEG.
///
/// The encoder writes full-resolution chroma (no subsampling).
pub fn encode_jpeg(canvas: &RgbImage, settings: EncodeSettings) -> PrintResult<Vec<u8>> {
    if !(1..=100).contains(&settings.quality) {
        return Err(PrintError::encode(format!(
            "jpeg quality must be in 1..=100, got {}",
            settings.quality
        )));
    }
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(PrintError::encode("cannot encode an empty canvas"));
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, settings.quality);
        if let Some(dpi) = settings.dpi {
            encoder.set_pixel_density(PixelDensity::dpi(dpi));
        }
        encoder
            .encode_image(canvas)
            .map_err(|e| PrintError::encode(format!("jpeg encode failed: {e}")))?;
    }
    Ok(buf.into_inner())
}

/// Downscale so the longer side is at most `max_side`. Smaller canvases are returned unchanged.
pub fn downscale_to_fit(canvas: &RgbImage, max_side: u32) -> RgbImage {
    let (w, h) = canvas.dimensions();
    let long = w.max(h);
    if max_side == 0 || long <= max_side {
        return canvas.clone();
    }
    let scale = f64::from(max_side) / f64::from(long);
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, max_side);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, max_side);
    imageops::resize(canvas, nw, nh, imageops::FilterType::Triangle)
}

/// Suggested file name for `variant` of a job printed at `spec`.
pub fn file_name_for(variant: Variant, spec: &PrintSpec) -> String {
    let label = spec.label();
    match variant {
        Variant::Print => format!("print-{label}.jpg"),
        Variant::Preview | Variant::DisplayPreview => format!("print-preview-{label}.jpg"),
    }
}

/// Everything needed to turn a canvas into one [`CompositeResult`].
#[derive(Clone, Debug)]
pub struct ArtifactPlan<'a> {
    /// Mode of the job.
    pub mode: RenderMode,
    /// Deliverable kind.
    pub variant: Variant,
    /// Encoder parameters.
    pub settings: EncodeSettings,
    /// Presentation hint.
    pub disposition: Disposition,
    /// Print size, for the file name.
    pub spec: &'a PrintSpec,
}

/// Encode `canvas` into a finished artifact.
#[tracing::instrument(skip_all, fields(variant = ?plan.variant, quality = plan.settings.quality))]
pub fn build_artifact(canvas: &RgbImage, plan: &ArtifactPlan<'_>) -> PrintResult<CompositeResult> {
    let bytes = encode_jpeg(canvas, plan.settings)?;
    let mut hasher = Fnv1a64::new_default();
    hasher.write_bytes(&bytes);
    tracing::debug!(bytes = bytes.len(), "encoded artifact");

    Ok(CompositeResult {
        format: ArtifactFormat::Jpeg,
        mode: plan.mode,
        variant: plan.variant,
        width: canvas.width(),
        height: canvas.height(),
        dpi: plan.settings.dpi,
        disposition: plan.disposition,
        file_name: file_name_for(plan.variant, plan.spec),
        fingerprint: hasher.finish(),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
