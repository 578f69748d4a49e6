//! Axis-aligned spatial extent.

use std::fmt;

use geo::Rect;

/// Axis-aligned bounding box in the units of some CRS.
///
/// The extent carries no CRS itself; it is always interpreted in the CRS of
/// the [`GeometrySet`](super::GeometrySet) it was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Western edge.
    pub min_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Northern edge.
    pub max_y: f64,
}

impl Extent {
    /// Create an extent from its four edges.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the extent in CRS units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the extent in CRS units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Midpoint of the extent.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grow this extent to also cover `other`.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        Extent {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height() {
        let e = Extent::new(0.0, 10.0, 100.0, 60.0);
        assert_eq!(e.width(), 100.0);
        assert_eq!(e.height(), 50.0);
    }

    #[test]
    fn test_center() {
        let e = Extent::new(-10.0, -20.0, 10.0, 20.0);
        assert_eq!(e.center(), (0.0, 0.0));

        let e = Extent::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(e.center(), (50.0, 25.0));
    }

    #[test]
    fn test_union() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(5.0, -5.0, 20.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u, Extent::new(0.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn test_union_contained() {
        let outer = Extent::new(0.0, 0.0, 10.0, 10.0);
        let inner = Extent::new(2.0, 2.0, 8.0, 8.0);
        assert_eq!(outer.union(&inner), outer);
    }

    #[test]
    fn test_from_rect() {
        let rect = Rect::new(
            geo::coord! { x: 1.0, y: 2.0 },
            geo::coord! { x: 3.0, y: 4.0 },
        );
        let e = Extent::from(rect);
        assert_eq!(e, Extent::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_display() {
        let e = Extent::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(format!("{}", e), "(0, 1) - (2, 3)");
    }
}
