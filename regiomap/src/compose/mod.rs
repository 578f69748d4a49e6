//! Layer composition and filtering.
//!
//! Merges the selected primary-territory layers into one attributed geometry
//! set, subtracts excluded regions, and selects the highlight subset. All
//! filters are pure: they take a set and produce a new one, so the composed
//! [`LayerBundle`] can be shared read-only across render workers.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::crs::Crs;
use crate::dataset::{DatasetError, VectorSource};
use crate::geometry::GeometrySet;

/// The three geometry sets participating in one map.
///
/// Invariants: `highlight` rows are a subset of `primary` rows by region
/// name, and never carry a name from the exclusion set. All three sets share
/// one CRS at any point in the pipeline.
#[derive(Debug, Clone)]
pub struct LayerBundle {
    /// Merged, exclusion-filtered primary territory.
    pub primary: GeometrySet,
    /// Neighboring territories, drawn behind the primary layer, unfiltered.
    pub secondary: GeometrySet,
    /// Subset of `primary` drawn with emphasis styling, possibly empty.
    pub highlight: GeometrySet,
}

/// Read each named layer from `source` and concatenate them into one set,
/// preserving the attribute schema.
///
/// Fails with [`DatasetError::MissingLayer`] when any named layer is absent.
pub fn merge_layers(
    source: &dyn VectorSource,
    layer_names: &[String],
) -> Result<GeometrySet, DatasetError> {
    let mut merged = Vec::new();
    let mut crs = Crs::WGS84;
    for name in layer_names {
        let set = source.read_layer(name)?;
        crs = *set.crs();
        merged.extend(set.features().iter().cloned());
    }
    debug!(layers = layer_names.len(), features = merged.len(), "merged layers");
    Ok(GeometrySet::new(crs, merged))
}

/// Drop every row whose region name is in `forbidden`.
///
/// Identity when `forbidden` is empty. Rows without a name attribute are
/// kept; exclusion only ever matches named regions.
pub fn apply_exclusion(set: &GeometrySet, forbidden: &HashSet<String>) -> GeometrySet {
    if forbidden.is_empty() {
        return set.clone();
    }
    let kept: Vec<_> = set
        .features()
        .iter()
        .filter(|f| f.name.as_ref().is_none_or(|n| !forbidden.contains(n)))
        .cloned()
        .collect();
    if kept.len() != set.len() {
        info!(
            removed = set.len() - kept.len(),
            "excluded regions from primary layer"
        );
    }
    GeometrySet::new(*set.crs(), kept)
}

/// Select the rows of `set` whose region name is in `wanted`, after silently
/// removing any name present in `forbidden` from the wish list.
///
/// The silent removal is a consistency guarantee, not an error: an excluded
/// region can never reappear through highlighting. An empty selection yields
/// an empty set, not an error.
pub fn select_highlight(
    set: &GeometrySet,
    wanted: &[String],
    forbidden: &HashSet<String>,
) -> GeometrySet {
    let allowed: HashSet<&str> = wanted
        .iter()
        .map(String::as_str)
        .filter(|n| !forbidden.contains(*n))
        .collect();
    if allowed.is_empty() {
        return GeometrySet::empty(*set.crs());
    }
    let selected: Vec<_> = set
        .features()
        .iter()
        .filter(|f| f.name.as_deref().is_some_and(|n| allowed.contains(n)))
        .cloned()
        .collect();
    debug!(wanted = wanted.len(), selected = selected.len(), "selected highlight regions");
    GeometrySet::new(*set.crs(), selected)
}

/// Compose the bundle for one map: merge and filter the primary layers, read
/// every layer of the secondary source, and select the highlight subset.
///
/// When `secondary_layers` is empty, all layers of the secondary source are
/// used.
pub fn compose_bundle(
    primary_source: &dyn VectorSource,
    primary_layers: &[String],
    secondary_source: &dyn VectorSource,
    secondary_layers: &[String],
    forbidden: &HashSet<String>,
    highlight_names: &[String],
) -> Result<LayerBundle, DatasetError> {
    let merged = merge_layers(primary_source, primary_layers)?;
    let primary = apply_exclusion(&merged, forbidden);
    let highlight = select_highlight(&primary, highlight_names, forbidden);

    let secondary_names = if secondary_layers.is_empty() {
        secondary_source.layer_names()?
    } else {
        secondary_layers.to_vec()
    };
    let secondary = merge_layers(secondary_source, &secondary_names)?;

    info!(
        primary = primary.len(),
        secondary = secondary.len(),
        highlight = highlight.len(),
        "composed layer bundle"
    );
    Ok(LayerBundle {
        primary,
        secondary,
        highlight,
    })
}
