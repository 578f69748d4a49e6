//! Scale-bar length and placement.
//!
//! Derives a round, human-legible bar length from the viewport width,
//! expressed both as a physical distance and as a fraction of the viewport.
//! Geographic (degree-based) extents are converted to Web Mercator before
//! any length arithmetic; degrees are not a distance.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::crs::{BuiltinTransformer, Crs, CrsTransform, ProjectionError};
use crate::geometry::Extent;

/// Normalized anchor position of the bar within the viewport.
///
/// Origin points are `(x, y)` fractions of the viewport, `y` measured
/// upward from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Bar starts at 5% from the left edge.
    #[default]
    BottomLeft,
    /// Bar starts at 45% of the width.
    BottomCenter,
    /// Bar starts at 85% of the width.
    BottomRight,
}

impl Anchor {
    /// Normalized origin of the bar's left end, `(x, y)` in `[0, 1]`.
    pub fn origin(&self) -> (f64, f64) {
        match self {
            Anchor::BottomLeft => (0.05, 0.05),
            Anchor::BottomCenter => (0.45, 0.05),
            Anchor::BottomRight => (0.85, 0.05),
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-left" => Ok(Anchor::BottomLeft),
            "bottom-center" => Ok(Anchor::BottomCenter),
            "bottom-right" => Ok(Anchor::BottomRight),
            other => Err(format!("unknown scale bar position '{other}'")),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomCenter => "bottom-center",
            Anchor::BottomRight => "bottom-right",
        };
        f.write_str(s)
    }
}

/// Computation inputs for the scale bar, passed explicitly at call time.
#[derive(Debug, Clone)]
pub struct ScaleBarOptions {
    /// Target bar length as a fraction of the viewport width, before
    /// rounding to a nice value.
    pub length_fraction: f64,
    /// Where the bar sits in the viewport.
    pub anchor: Anchor,
}

impl Default for ScaleBarOptions {
    fn default() -> Self {
        Self {
            length_fraction: 0.1,
            anchor: Anchor::BottomLeft,
        }
    }
}

/// A computed scale bar: physical length, label, and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBarSpec {
    /// Bar length in meters, always of the form {1,2,5,10} x 10^k.
    pub length_m: f64,
    /// Formatted label, kilometers at 1000 m and above.
    pub label: String,
    /// Placement within the viewport.
    pub anchor: Anchor,
    /// Bar length as a fraction of the viewport width.
    pub fraction_of_width: f64,
}

/// Round to the nearest "nice" value of the form {1,2,5,10} x 10^k.
///
/// Non-positive input yields 0, a defined boundary case. Idempotent for all
/// positive inputs.
pub fn nice_number(x: f64) -> f64 {
    if x <= 0.0 || !x.is_finite() {
        return 0.0;
    }
    let exp = x.log10().floor() as i32;
    let f = x / 10f64.powi(exp);
    let nice_f = if f < 1.5 {
        1.0
    } else if f < 3.0 {
        2.0
    } else if f < 7.0 {
        5.0
    } else {
        10.0
    };
    nice_f * 10f64.powi(exp)
}

/// Format a bar length in meters as a label, kilometers at 1000 m and above.
fn format_length(length_m: f64) -> String {
    if length_m >= 1000.0 {
        format!("{} km", (length_m / 1000.0).round() as i64)
    } else {
        format!("{} m", length_m.round() as i64)
    }
}

/// Compute the scale bar for a viewport extent in `crs`.
///
/// Geographic extents are projected corner-wise into Web Mercator first so
/// the width arithmetic happens in meters. Fails with [`ProjectionError`]
/// when the CRS cannot be brought into a metric system; the failure is
/// scoped to the render iteration that requested it.
pub fn compute(
    extent: &Extent,
    crs: &Crs,
    options: &ScaleBarOptions,
) -> Result<ScaleBarSpec, ProjectionError> {
    let metric = if crs.is_geographic() {
        let transformer = BuiltinTransformer::new();
        let (min_x, min_y) =
            transformer.project_point(extent.min_x, extent.min_y, crs, &Crs::WEB_MERCATOR)?;
        let (max_x, max_y) =
            transformer.project_point(extent.max_x, extent.max_y, crs, &Crs::WEB_MERCATOR)?;
        Extent::new(min_x, min_y, max_x, max_y)
    } else {
        *extent
    };

    let map_width = metric.width();
    let raw_length = map_width * options.length_fraction;
    let length_m = nice_number(raw_length);
    let fraction_of_width = length_m / map_width;
    let label = format_length(length_m);

    debug!(raw_length, length_m, %label, "computed scale bar");
    Ok(ScaleBarSpec {
        length_m,
        label,
        anchor: options.anchor,
        fraction_of_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_number_thresholds() {
        assert_eq!(nice_number(37_000.0), 50_000.0);
        assert_eq!(nice_number(420.0), 500.0);
        assert_eq!(nice_number(1.0), 1.0);
        assert_eq!(nice_number(1.4), 1.0);
        assert_eq!(nice_number(1.5), 2.0);
        assert_eq!(nice_number(2.9), 2.0);
        assert_eq!(nice_number(3.0), 5.0);
        assert_eq!(nice_number(6.9), 5.0);
        assert_eq!(nice_number(7.0), 10.0);
        assert_eq!(nice_number(9.5), 10.0);
    }

    #[test]
    fn test_nice_number_boundary_cases() {
        assert_eq!(nice_number(0.0), 0.0);
        assert_eq!(nice_number(-12.0), 0.0);
        assert_eq!(nice_number(f64::NAN), 0.0);
        assert_eq!(nice_number(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_nice_number_is_idempotent() {
        for x in [0.003, 0.7, 1.0, 19.0, 420.0, 37_000.0, 8.8e9] {
            let once = nice_number(x);
            assert_eq!(nice_number(once), once, "not idempotent at {x}");
        }
    }

    #[test]
    fn test_nice_number_form() {
        for x in [0.0042, 0.11, 2.3, 47.0, 999.0, 123_456.0] {
            let n = nice_number(x);
            let exp = n.log10().floor() as i32;
            let f = (n / 10f64.powi(exp)).round();
            assert!(
                [1.0, 2.0, 5.0, 10.0].contains(&f),
                "nice_number({x}) = {n} has factor {f}"
            );
        }
    }

    #[test]
    fn test_label_kilometers() {
        assert_eq!(format_length(50_000.0), "50 km");
        assert_eq!(format_length(1000.0), "1 km");
        assert_eq!(format_length(2_000_000.0), "2000 km");
    }

    #[test]
    fn test_label_meters() {
        assert_eq!(format_length(500.0), "500 m");
        assert_eq!(format_length(999.0), "999 m");
        assert_eq!(format_length(20.0), "20 m");
    }

    #[test]
    fn test_compute_projected_extent() {
        // 370 km wide metric viewport, default 10% fraction: raw 37 km,
        // rounded to 50 km.
        let extent = Extent::new(0.0, 0.0, 370_000.0, 200_000.0);
        let spec = compute(&extent, &Crs::from_epsg(3035), &ScaleBarOptions::default()).unwrap();
        assert_eq!(spec.length_m, 50_000.0);
        assert_eq!(spec.label, "50 km");
        assert!((spec.fraction_of_width - 50_000.0 / 370_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_geographic_extent_goes_metric() {
        // One degree of longitude at the equator is ~111 km in Web Mercator,
        // so a 1-degree-wide viewport yields a 10 km bar at fraction 0.1.
        let extent = Extent::new(0.0, 0.0, 1.0, 0.5);
        let spec = compute(&extent, &Crs::WGS84, &ScaleBarOptions::default()).unwrap();
        assert_eq!(spec.length_m, 10_000.0);
        assert_eq!(spec.label, "10 km");
    }

    #[test]
    fn test_compute_fraction_stays_near_request() {
        let extent = Extent::new(0.0, 0.0, 1_000_000.0, 600_000.0);
        let spec = compute(&extent, &Crs::from_epsg(3035), &ScaleBarOptions::default()).unwrap();
        // Nice rounding keeps the bar within a factor of ~2 of the request.
        assert!(spec.fraction_of_width > 0.05 && spec.fraction_of_width < 0.2);
    }

    #[test]
    fn test_anchor_origins() {
        assert_eq!(Anchor::BottomLeft.origin(), (0.05, 0.05));
        assert_eq!(Anchor::BottomCenter.origin(), (0.45, 0.05));
        assert_eq!(Anchor::BottomRight.origin(), (0.85, 0.05));
    }

    #[test]
    fn test_anchor_parse_round_trip() {
        for anchor in [Anchor::BottomLeft, Anchor::BottomCenter, Anchor::BottomRight] {
            let parsed: Anchor = anchor.to_string().parse().unwrap();
            assert_eq!(parsed, anchor);
        }
        assert!("top-left".parse::<Anchor>().is_err());
    }
}
