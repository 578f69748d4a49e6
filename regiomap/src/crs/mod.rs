//! Coordinate reference system identifiers and transforms.
//!
//! A [`Crs`] names a spatial reference by EPSG code. The built-in
//! [`BuiltinTransformer`] covers forward projection from WGS84 geographic
//! coordinates (the CRS of all GeoJSON input) into the projected systems the
//! renderer targets; the [`CrsTransform`] trait is the seam for plugging in a
//! richer external transform capability.

mod projection;
mod transform;

pub use transform::{BuiltinTransformer, CrsTransform};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while resolving or applying a coordinate transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// CRS identifier could not be parsed or is not in the registry.
    #[error("unknown CRS identifier '{0}'")]
    UnknownCrs(String),

    /// No transform path exists between the two systems.
    #[error("no transform path from {from} to {to}")]
    UnsupportedTransform {
        /// Source CRS.
        from: Crs,
        /// Target CRS.
        to: Crs,
    },

    /// Coordinate lies outside the valid domain of the target projection.
    #[error("coordinate ({x}, {y}) is outside the domain of {crs}")]
    OutOfDomain {
        /// Easting or longitude of the offending coordinate.
        x: f64,
        /// Northing or latitude of the offending coordinate.
        y: f64,
        /// The projection that rejected it.
        crs: Crs,
    },
}

/// A coordinate reference system, identified by EPSG code.
///
/// # Examples
///
/// ```
/// use regiomap::crs::Crs;
///
/// let crs: Crs = "EPSG:3035".parse().unwrap();
/// assert_eq!(crs.code(), 3035);
/// assert!(!crs.is_geographic());
/// assert_eq!(crs.to_string(), "EPSG:3035");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs {
    code: u32,
}

impl Crs {
    /// WGS84 geographic coordinates (degrees).
    pub const WGS84: Crs = Crs { code: 4326 };

    /// Web Mercator (meters), the fixed reference for scale-bar arithmetic
    /// on geographic extents.
    pub const WEB_MERCATOR: Crs = Crs { code: 3857 };

    /// Create a CRS from a bare EPSG code.
    pub fn from_epsg(code: u32) -> Self {
        Self { code }
    }

    /// The EPSG code.
    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Whether coordinates in this system are angular (degrees) rather than
    /// linear (meters).
    pub fn is_geographic(&self) -> bool {
        self.code == 4326
    }

    /// Filesystem-safe form of the identifier (`EPSG_3035`), used in output
    /// file names.
    pub fn slug(&self) -> String {
        format!("EPSG_{}", self.code)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.code)
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    /// Parse an `EPSG:<code>` identifier (authority prefix case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .split_once(':')
            .filter(|(authority, _)| authority.eq_ignore_ascii_case("epsg"))
            .and_then(|(_, code)| code.parse::<u32>().ok())
            .ok_or_else(|| ProjectionError::UnknownCrs(trimmed.to_string()))?;
        Ok(Crs { code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epsg_identifier() {
        let crs: Crs = "EPSG:4326".parse().unwrap();
        assert_eq!(crs, Crs::WGS84);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let crs: Crs = "epsg:3857".parse().unwrap();
        assert_eq!(crs, Crs::WEB_MERCATOR);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let crs: Crs = " EPSG:25832 ".parse().unwrap();
        assert_eq!(crs.code(), 25832);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("UTM32".parse::<Crs>().is_err());
        assert!("EPSG:abc".parse::<Crs>().is_err());
        assert!("".parse::<Crs>().is_err());
    }

    #[test]
    fn test_geographic_flag() {
        assert!(Crs::WGS84.is_geographic());
        assert!(!Crs::WEB_MERCATOR.is_geographic());
        assert!(!Crs::from_epsg(3035).is_geographic());
    }

    #[test]
    fn test_display_and_slug() {
        let crs = Crs::from_epsg(3035);
        assert_eq!(format!("{}", crs), "EPSG:3035");
        assert_eq!(crs.slug(), "EPSG_3035");
    }

    #[test]
    fn test_unknown_crs_error_carries_input() {
        let err = "ESRI:54009".parse::<Crs>().unwrap_err();
        assert_eq!(
            err,
            ProjectionError::UnknownCrs("ESRI:54009".to_string())
        );
    }
}
