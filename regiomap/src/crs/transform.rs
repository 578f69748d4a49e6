//! Coordinate transform capability.

use geo::MapCoords;
use tracing::debug;

use crate::geometry::GeometrySet;

use super::projection::{
    lambert_azimuthal_equal_area, transverse_mercator, web_mercator, MERCATOR_MAX_LAT,
};
use super::{Crs, ProjectionError};

/// A capability that reprojects geometry between coordinate reference systems.
///
/// Implementations must be shareable across render workers, which hand the
/// same transformer to one thread per target CRS.
pub trait CrsTransform: Send + Sync {
    /// Project a single coordinate from `source` into `target`.
    fn project_point(
        &self,
        x: f64,
        y: f64,
        source: &Crs,
        target: &Crs,
    ) -> Result<(f64, f64), ProjectionError>;

    /// Produce a new [`GeometrySet`] with every coordinate of `set`
    /// projected into `target`. The input set is left untouched.
    fn reproject(&self, set: &GeometrySet, target: &Crs) -> Result<GeometrySet, ProjectionError> {
        if set.crs() == target {
            return Ok(set.clone());
        }
        let source = *set.crs();
        let features = set
            .features()
            .iter()
            .map(|feature| {
                let geometry = feature.geometry.try_map_coords(|coord| {
                    let (x, y) = self.project_point(coord.x, coord.y, &source, target)?;
                    Ok::<_, ProjectionError>(geo::coord! { x: x, y: y })
                })?;
                Ok(crate::geometry::Feature {
                    geometry,
                    name: feature.name.clone(),
                    properties: feature.properties.clone(),
                })
            })
            .collect::<Result<Vec<_>, ProjectionError>>()?;
        debug!(%source, %target, features = features.len(), "reprojected geometry set");
        Ok(GeometrySet::new(*target, features))
    }
}

/// Built-in transformer covering the projections the renderer targets.
///
/// Supported paths: identity, and WGS84 geographic into Web Mercator
/// (EPSG:3857), ETRS89-LAEA Europe (EPSG:3035) and the ETRS89 UTM zones
/// 32N/33N (EPSG:25832/25833). Anything else is an
/// [`ProjectionError::UnsupportedTransform`]; callers needing more plug in
/// their own [`CrsTransform`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransformer;

impl BuiltinTransformer {
    /// Create the built-in transformer.
    pub fn new() -> Self {
        Self
    }

    fn check_geographic_domain(
        x: f64,
        y: f64,
        target: &Crs,
    ) -> Result<(), ProjectionError> {
        if !x.is_finite() || !y.is_finite() || y.abs() > 90.0 || x.abs() > 180.0 {
            return Err(ProjectionError::OutOfDomain { x, y, crs: *target });
        }
        Ok(())
    }
}

impl CrsTransform for BuiltinTransformer {
    fn project_point(
        &self,
        x: f64,
        y: f64,
        source: &Crs,
        target: &Crs,
    ) -> Result<(f64, f64), ProjectionError> {
        if source == target {
            return Ok((x, y));
        }
        if !source.is_geographic() {
            return Err(ProjectionError::UnsupportedTransform {
                from: *source,
                to: *target,
            });
        }
        Self::check_geographic_domain(x, y, target)?;
        match target.code() {
            3857 => {
                if y.abs() > MERCATOR_MAX_LAT {
                    return Err(ProjectionError::OutOfDomain { x, y, crs: *target });
                }
                Ok(web_mercator(x, y))
            }
            3035 => Ok(lambert_azimuthal_equal_area(
                x,
                y,
                10.0,
                52.0,
                4_321_000.0,
                3_210_000.0,
            )),
            25832 => Ok(transverse_mercator(x, y, 9.0, 0.9996, 500_000.0, 0.0)),
            25833 => Ok(transverse_mercator(x, y, 15.0, 0.9996, 500_000.0, 0.0)),
            _ => Err(ProjectionError::UnsupportedTransform {
                from: *source,
                to: *target,
            }),
        }
    }
}
