//! Render target description.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use super::style::Background;

/// Errors raised while resolving export formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The requested format has no encoder. The format is skipped with a
    /// warning; sibling formats are still produced.
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),
}

/// An output encoding the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Raster PNG with alpha.
    Png,
    /// Vector SVG document.
    Svg,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// The pixel footprint and export settings of one output image.
///
/// Constructed once per output, consumed by the export step. The pixel
/// dimensions are exact: DPI scales line widths and label glyphs, never the
/// final image size.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Dots per inch, used to scale strokes and glyphs specified in points.
    pub dpi: u32,
    /// Formats to emit, one image per entry.
    pub formats: Vec<ExportFormat>,
    /// Background styling.
    pub background: Background,
}

impl RenderTarget {
    /// The pixel aspect ratio this target requests.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Scale factor converting point-sized strokes and glyphs to pixels.
    pub fn point_scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// Resolve requested format names, warning about and dropping the ones
    /// without an encoder.
    ///
    /// Returns the supported formats in request order plus the errors for
    /// the skipped ones.
    pub fn resolve_formats(names: &[String]) -> (Vec<ExportFormat>, Vec<ExportError>) {
        let mut formats = Vec::new();
        let mut skipped = Vec::new();
        for name in names {
            match name.parse::<ExportFormat>() {
                Ok(format) => {
                    if !formats.contains(&format) {
                        formats.push(format);
                    }
                }
                Err(e) => {
                    warn!(format = %name, "skipping unsupported export format");
                    skipped.push(e);
                }
            }
        }
        (formats, skipped)
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            dpi: 100,
            formats: vec![ExportFormat::Png],
            background: Background::Transparent,
        }
    }
}
