//! Attributed geometry collections.

use geo::{BoundingRect, Geometry};
use serde_json::{Map, Value};

use crate::crs::Crs;

use super::Extent;

/// One geometry with its attribute row.
///
/// The region name is extracted from the attribute row at read time so the
/// filtering stages never have to re-inspect the property map.
#[derive(Debug, Clone)]
pub struct Feature {
    /// The geometry, in the CRS of the owning [`GeometrySet`].
    pub geometry: Geometry<f64>,
    /// Region name attribute, if the row carried one.
    pub name: Option<String>,
    /// Full attribute row as read from the source layer.
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a feature with an empty attribute row.
    pub fn new(geometry: Geometry<f64>, name: Option<String>) -> Self {
        Self {
            geometry,
            name,
            properties: Map::new(),
        }
    }
}

/// An ordered collection of features sharing one CRS.
///
/// Invariant: every member geometry is expressed in `crs`. A set is never
/// mutated after construction; reprojection and filtering produce new sets.
#[derive(Debug, Clone)]
pub struct GeometrySet {
    crs: Crs,
    features: Vec<Feature>,
}

impl GeometrySet {
    /// Create a set from features already expressed in `crs`.
    pub fn new(crs: Crs, features: Vec<Feature>) -> Self {
        Self { crs, features }
    }

    /// Create an empty set in `crs`.
    pub fn empty(crs: Crs) -> Self {
        Self {
            crs,
            features: Vec::new(),
        }
    }

    /// The CRS every member geometry is expressed in.
    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// The member features, in insertion order.
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the set has no features.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Region names present in the set, in feature order, skipping unnamed rows.
    pub fn names(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter_map(|f| f.name.as_deref())
            .collect()
    }

    /// Total extent of all member geometries.
    ///
    /// Returns `None` when the set is empty or no member has a computable
    /// bounding rectangle.
    pub fn extent(&self) -> Option<Extent> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounding_rect())
            .map(Extent::from)
            .reduce(|acc, e| acc.union(&e))
    }
}
