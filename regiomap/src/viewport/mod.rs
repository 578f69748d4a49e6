//! Viewport fitting.
//!
//! Fits a padded bounding box around a dataset extent so that the box
//! exactly matches a requested pixel aspect ratio while keeping the
//! extent's center. The wider dimension relative to the target ratio is
//! held; the other is stretched to match.

use thiserror::Error;

use crate::geometry::Extent;

/// Default padding factor, a 5% margin around the fitted box.
pub const DEFAULT_PADDING: f64 = 1.05;

/// Errors raised while fitting a viewport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    /// The input extent has zero width or height, so no aspect-preserving
    /// box exists. Point-like datasets must be rejected upstream.
    #[error("degenerate extent: width={width}, height={height}")]
    DegenerateExtent {
        /// Extent width in CRS units.
        width: f64,
        /// Extent height in CRS units.
        height: f64,
    },

    /// The requested aspect ratio is not a positive finite number.
    #[error("invalid aspect ratio {0}")]
    InvalidAspectRatio(f64),
}

/// The rectangular coordinate window a rendered image displays.
///
/// Invariants: `width / height` equals the aspect ratio it was fit to within
/// floating-point tolerance, and the center equals the source extent's
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Western edge.
    pub min_x: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Northern edge.
    pub max_y: f64,
    /// The pixel aspect ratio this viewport was fit to.
    pub aspect_ratio: f64,
    /// The padding factor that was applied.
    pub padding: f64,
}

impl Viewport {
    /// Width of the window in CRS units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the window in CRS units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The window as an [`Extent`].
    pub fn extent(&self) -> Extent {
        Extent::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Fit a viewport of the given aspect ratio around `extent`.
///
/// The extent's center is preserved. Both dimensions are multiplied by
/// `padding` after the ratio fit; pass `1.0` for a tight fit.
pub fn fit(extent: &Extent, aspect_ratio: f64, padding: f64) -> Result<Viewport, ViewportError> {
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(ViewportError::InvalidAspectRatio(aspect_ratio));
    }

    let width = extent.width();
    let height = extent.height();
    if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
        return Err(ViewportError::DegenerateExtent { width, height });
    }

    let (cx, cy) = extent.center();
    let current_ratio = width / height;

    let (mut new_width, mut new_height) = if current_ratio > aspect_ratio {
        (width, width / aspect_ratio)
    } else {
        (height * aspect_ratio, height)
    };
    new_width *= padding;
    new_height *= padding;

    Ok(Viewport {
        min_x: cx - new_width / 2.0,
        max_x: cx + new_width / 2.0,
        min_y: cy - new_height / 2.0,
        max_y: cy + new_height / 2.0,
        aspect_ratio,
        padding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_matching_ratio_is_unchanged() {
        // Extent already at the target ratio, no padding.
        let vp = fit(&Extent::new(0.0, 0.0, 100.0, 50.0), 2.0, 1.0).unwrap();
        assert_close(vp.min_x, 0.0);
        assert_close(vp.max_x, 100.0);
        assert_close(vp.min_y, 0.0);
        assert_close(vp.max_y, 50.0);
    }

    #[test]
    fn test_tall_extent_grows_in_width() {
        // Ratio 0.5 < 1.0: height held at 200, width stretched to 200.
        let vp = fit(&Extent::new(0.0, 0.0, 100.0, 200.0), 1.0, 1.0).unwrap();
        assert_close(vp.min_x, -50.0);
        assert_close(vp.max_x, 150.0);
        assert_close(vp.min_y, 0.0);
        assert_close(vp.max_y, 200.0);
    }

    #[test]
    fn test_wide_extent_grows_in_height() {
        // Ratio 4.0 > 1.0: width held, height stretched to width / ratio.
        let vp = fit(&Extent::new(0.0, 0.0, 400.0, 50.0), 1.0, 1.0).unwrap();
        assert_close(vp.width(), 400.0);
        assert_close(vp.height(), 400.0);
        assert_close(vp.min_y, -175.0);
        assert_close(vp.max_y, 225.0);
    }

    #[test]
    fn test_ratio_invariant_holds() {
        let extents = [
            Extent::new(0.0, 0.0, 17.0, 3.0),
            Extent::new(-8.5, 2.0, 13.25, 99.0),
            Extent::new(1e6, 2e6, 1.5e6, 2.1e6),
        ];
        let ratios = [0.4, 1.0, 1.777, 3.0];
        for extent in &extents {
            for &ratio in &ratios {
                let vp = fit(extent, ratio, DEFAULT_PADDING).unwrap();
                assert!(
                    (vp.width() / vp.height() - ratio).abs() < 1e-9,
                    "ratio drifted for {extent} at {ratio}"
                );
            }
        }
    }

    #[test]
    fn test_center_is_preserved() {
        let extent = Extent::new(3.0, -7.0, 19.0, 42.0);
        let vp = fit(&extent, 1.6, DEFAULT_PADDING).unwrap();
        let (cx, cy) = extent.center();
        assert_close((vp.min_x + vp.max_x) / 2.0, cx);
        assert_close((vp.min_y + vp.max_y) / 2.0, cy);
    }

    #[test]
    fn test_padding_scales_both_dimensions() {
        let tight = fit(&Extent::new(0.0, 0.0, 100.0, 50.0), 2.0, 1.0).unwrap();
        let padded = fit(&Extent::new(0.0, 0.0, 100.0, 50.0), 2.0, 1.05).unwrap();
        assert_close(padded.width(), tight.width() * 1.05);
        assert_close(padded.height(), tight.height() * 1.05);
    }

    #[test]
    fn test_zero_width_extent_is_rejected() {
        let err = fit(&Extent::new(5.0, 0.0, 5.0, 10.0), 1.0, 1.0).unwrap_err();
        assert!(matches!(err, ViewportError::DegenerateExtent { .. }));
    }

    #[test]
    fn test_point_extent_is_rejected() {
        let err = fit(&Extent::new(5.0, 5.0, 5.0, 5.0), 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            ViewportError::DegenerateExtent {
                width: 0.0,
                height: 0.0
            }
        );
    }

    #[test]
    fn test_invalid_aspect_ratio_is_rejected() {
        let extent = Extent::new(0.0, 0.0, 1.0, 1.0);
        assert!(fit(&extent, 0.0, 1.0).is_err());
        assert!(fit(&extent, -2.0, 1.0).is_err());
        assert!(fit(&extent, f64::NAN, 1.0).is_err());
    }
}
