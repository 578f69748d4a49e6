//! Viewport-to-pixel coordinate mapping.

use crate::viewport::Viewport;

/// Affine mapping from viewport coordinates to pixel coordinates.
///
/// Pixel `y` grows downward, viewport `y` grows upward. Because the viewport
/// was fit to the target's pixel aspect ratio, the two scale factors agree up
/// to floating-point noise; both are kept so the crop to the viewport edges
/// is exact on each axis.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PixelMap {
    min_x: f64,
    max_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl PixelMap {
    pub(crate) fn new(viewport: &Viewport, width: u32, height: u32) -> Self {
        Self {
            min_x: viewport.min_x,
            max_y: viewport.max_y,
            scale_x: f64::from(width) / viewport.width(),
            scale_y: f64::from(height) / viewport.height(),
        }
    }

    /// Map a viewport coordinate to pixel space.
    #[inline]
    pub(crate) fn project(&self, x: f64, y: f64) -> (f32, f32) {
        (
            ((x - self.min_x) * self.scale_x) as f32,
            ((self.max_y - y) * self.scale_y) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Extent;
    use crate::viewport;

    fn viewport_0_10() -> Viewport {
        viewport::fit(&Extent::new(0.0, 0.0, 10.0, 10.0), 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_corners() {
        let map = PixelMap::new(&viewport_0_10(), 100, 100);
        assert_eq!(map.project(0.0, 10.0), (0.0, 0.0)); // top-left
        assert_eq!(map.project(10.0, 0.0), (100.0, 100.0)); // bottom-right
    }

    #[test]
    fn test_center() {
        let map = PixelMap::new(&viewport_0_10(), 100, 100);
        assert_eq!(map.project(5.0, 5.0), (50.0, 50.0));
    }

    #[test]
    fn test_y_axis_flips() {
        let map = PixelMap::new(&viewport_0_10(), 100, 100);
        let (_, y_north) = map.project(5.0, 9.0);
        let (_, y_south) = map.project(5.0, 1.0);
        assert!(y_north < y_south);
    }
}
