//! Per-projection render loop.
//!
//! For each target CRS the loop reprojects the composed layer bundle, fits
//! the viewport, computes the scale bar, draws the fixed z-order (secondary,
//! primary, highlight) and exports one image per requested format at an
//! exact pixel size.
//!
//! The loop body is embarrassingly parallel: every iteration reads the same
//! immutable bundle and writes only its own outputs, so multi-CRS runs use
//! one worker thread per target CRS with no synchronization beyond
//! collecting results.

mod canvas;
mod glyphs;
mod pixel;
mod style;
mod svg;
mod target;

pub use style::{Background, ColorScheme, Rgba, ScaleBarStyle};
pub use target::{ExportError, ExportFormat, RenderTarget};

use std::thread;

use thiserror::Error;
use tracing::{info, warn};

use crate::compose::LayerBundle;
use crate::crs::{Crs, CrsTransform, ProjectionError};
use crate::scalebar::{self, ScaleBarOptions, ScaleBarSpec};
use crate::viewport::{self, ViewportError, DEFAULT_PADDING};

use canvas::Canvas;
use svg::SvgDocument;

/// Errors that can fail one render iteration.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// Reprojection into the target CRS failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// The reprojected primary extent cannot host a viewport.
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    /// Encoding one output format failed.
    #[error("{format} export failed: {message}")]
    ExportFailed {
        /// The format that failed to encode.
        format: ExportFormat,
        /// Encoder diagnostic.
        message: String,
    },

    /// The pixel canvas could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    CanvasAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A render worker thread panicked.
    #[error("render worker for {0} panicked")]
    WorkerPanicked(Crs),
}

/// What to do when one target CRS fails while others remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Render the remaining CRSs and report failures at the end.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Scale-bar settings for a render run: the computation inputs plus how the
/// bar is drawn.
#[derive(Debug, Clone, Default)]
pub struct ScaleBarRequest {
    /// Length fraction and anchor.
    pub options: ScaleBarOptions,
    /// Color, line width, glyph size.
    pub style: ScaleBarStyle,
}

/// Everything one render run needs besides the bundle itself.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Region name, used in output file names.
    pub region: String,
    /// Target CRSs, one output set per entry, order preserved.
    pub crs_list: Vec<Crs>,
    /// Pixel footprint and export settings.
    pub target: RenderTarget,
    /// Layer fill and border colors.
    pub colors: ColorScheme,
    /// Border stroke width in points.
    pub border_width: f32,
    /// Scale bar, or `None` to suppress it.
    pub scale_bar: Option<ScaleBarRequest>,
    /// Viewport padding factor.
    pub padding: f64,
    /// Per-CRS failure handling.
    pub policy: FailurePolicy,
}

impl RenderRequest {
    /// A request with default styling for the given region and CRS list.
    pub fn new(region: impl Into<String>, crs_list: Vec<Crs>) -> Self {
        Self {
            region: region.into(),
            crs_list,
            target: RenderTarget::default(),
            colors: ColorScheme::default(),
            border_width: 1.0,
            scale_bar: Some(ScaleBarRequest::default()),
            padding: DEFAULT_PADDING,
            policy: FailurePolicy::default(),
        }
    }
}

/// One encoded output image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// The CRS this image was rendered in.
    pub crs: Crs,
    /// The encoding of `bytes`.
    pub format: ExportFormat,
    /// Encoded image data.
    pub bytes: Vec<u8>,
    /// Deterministic file name: region, CRS and generation timestamp.
    pub file_name: String,
}

/// A failure scoped to one target CRS.
#[derive(Debug, Clone)]
pub struct CrsFailure {
    /// The CRS whose iteration failed.
    pub crs: Crs,
    /// What went wrong.
    pub error: RenderError,
}

/// The outcome of a render run: the images that succeeded and the per-CRS
/// failures, in input order.
#[derive(Debug, Clone, Default)]
pub struct RenderRun {
    /// Encoded images, grouped by CRS in request order.
    pub images: Vec<RenderedImage>,
    /// Iterations that failed.
    pub failures: Vec<CrsFailure>,
}

impl RenderRun {
    /// Whether every requested CRS produced its images.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Output file name for one image: `{region}_{crs}_{timestamp}.{ext}`.
pub fn output_name(region: &str, crs: &Crs, timestamp: &str, format: ExportFormat) -> String {
    format!(
        "{}_{}_{}.{}",
        region,
        crs.slug(),
        timestamp,
        format.extension()
    )
}

/// Render the bundle into every requested CRS and format.
///
/// Under [`FailurePolicy::Continue`] the returned [`RenderRun`] carries both
/// the successful images and the per-CRS failures; under
/// [`FailurePolicy::Abort`] the first failure is returned as an error and
/// any images from other iterations are dropped.
pub fn render_all(
    bundle: &LayerBundle,
    transformer: &dyn CrsTransform,
    request: &RenderRequest,
) -> Result<RenderRun, RenderError> {
    let timestamp = chrono::Local::now()
        .format("%Y-%m-%d_%H-%M-%S")
        .to_string();

    let results: Vec<Result<Vec<RenderedImage>, RenderError>> =
        if request.crs_list.len() <= 1 {
            request
                .crs_list
                .iter()
                .map(|crs| render_one(bundle, transformer, crs, request, &timestamp))
                .collect()
        } else {
            render_parallel(bundle, transformer, request, &timestamp)
        };

    let mut run = RenderRun::default();
    for (crs, result) in request.crs_list.iter().zip(results) {
        match result {
            Ok(images) => run.images.extend(images),
            Err(error) => match request.policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Continue => {
                    warn!(%crs, %error, "render iteration failed, continuing");
                    run.failures.push(CrsFailure { crs: *crs, error });
                }
            },
        }
    }
    info!(
        images = run.images.len(),
        failures = run.failures.len(),
        "render run finished"
    );
    Ok(run)
}

/// One worker thread per target CRS; results are collected in input order.
fn render_parallel(
    bundle: &LayerBundle,
    transformer: &dyn CrsTransform,
    request: &RenderRequest,
    timestamp: &str,
) -> Vec<Result<Vec<RenderedImage>, RenderError>> {
    thread::scope(|scope| {
        let handles: Vec<_> = request
            .crs_list
            .iter()
            .map(|crs| {
                let handle = thread::Builder::new()
                    .name(format!("render-{}", crs.slug()))
                    .spawn_scoped(scope, move || {
                        render_one(bundle, transformer, crs, request, timestamp)
                    })
                    .expect("failed to spawn render worker thread");
                (*crs, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(crs, handle)| match handle.join() {
                Ok(result) => result,
                Err(_) => Err(RenderError::WorkerPanicked(crs)),
            })
            .collect()
    })
}

/// The loop body for one target CRS: reproject, fit, compute the bar, draw,
/// export.
fn render_one(
    bundle: &LayerBundle,
    transformer: &dyn CrsTransform,
    crs: &Crs,
    request: &RenderRequest,
    timestamp: &str,
) -> Result<Vec<RenderedImage>, RenderError> {
    let primary = transformer.reproject(&bundle.primary, crs)?;
    let secondary = transformer.reproject(&bundle.secondary, crs)?;
    let highlight = transformer.reproject(&bundle.highlight, crs)?;

    let extent = primary
        .extent()
        .ok_or(ViewportError::DegenerateExtent {
            width: 0.0,
            height: 0.0,
        })?;
    let viewport = viewport::fit(&extent, request.target.aspect_ratio(), request.padding)?;

    let scale_bar: Option<(ScaleBarSpec, &ScaleBarRequest)> = match &request.scale_bar {
        Some(sb) => Some((scalebar::compute(&viewport.extent(), crs, &sb.options)?, sb)),
        None => None,
    };

    let mut images = Vec::with_capacity(request.target.formats.len());
    for format in &request.target.formats {
        let bytes = match format {
            ExportFormat::Png => {
                let mut canvas = Canvas::new(&request.target, &viewport)?;
                draw_layers(&mut canvas, &secondary, &primary, &highlight, request);
                if let Some((spec, sb)) = &scale_bar {
                    canvas.draw_scale_bar(spec, &sb.style);
                }
                canvas.encode_png()?
            }
            ExportFormat::Svg => {
                let mut doc = SvgDocument::new(&request.target, &viewport);
                doc.draw_set(
                    &secondary,
                    request.colors.secondary,
                    request.colors.border,
                    request.border_width,
                );
                doc.draw_set(
                    &primary,
                    request.colors.primary,
                    request.colors.border,
                    request.border_width,
                );
                if !highlight.is_empty() {
                    doc.draw_set(
                        &highlight,
                        request.colors.highlight,
                        request.colors.border,
                        request.border_width,
                    );
                }
                if let Some((spec, sb)) = &scale_bar {
                    doc.draw_scale_bar(spec, &sb.style);
                }
                doc.finish()
            }
        };
        images.push(RenderedImage {
            crs: *crs,
            format: *format,
            bytes,
            file_name: output_name(&request.region, crs, timestamp, *format),
        });
    }

    info!(%crs, images = images.len(), "rendered projection");
    Ok(images)
}

/// Fixed draw order: secondary behind, primary above it, highlight always on
/// top so emphasized regions are never occluded.
fn draw_layers(
    canvas: &mut Canvas,
    secondary: &crate::geometry::GeometrySet,
    primary: &crate::geometry::GeometrySet,
    highlight: &crate::geometry::GeometrySet,
    request: &RenderRequest,
) {
    canvas.draw_set(
        secondary,
        request.colors.secondary,
        request.colors.border,
        request.border_width,
    );
    canvas.draw_set(
        primary,
        request.colors.primary,
        request.colors.border,
        request.border_width,
    );
    if !highlight.is_empty() {
        canvas.draw_set(
            highlight,
            request.colors.highlight,
            request.colors.border,
            request.border_width,
        );
    }
}
