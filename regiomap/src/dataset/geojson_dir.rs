//! GeoJSON directory dataset.

use std::fs;
use std::path::{Path, PathBuf};

use geo::Geometry;
use geojson::GeoJson;
use serde_json::Value;
use tracing::{debug, warn};

use crate::crs::Crs;
use crate::geometry::{Feature, GeometrySet};

use super::{DatasetError, VectorSource, DEFAULT_NAME_KEY};

/// A directory of `.geojson` files, each file being one layer named by its
/// file stem.
///
/// GeoJSON coordinates are WGS84 by definition (RFC 7946), so every layer is
/// produced in EPSG:4326.
///
/// # Examples
///
/// ```no_run
/// use regiomap::dataset::{GeoJsonDirectory, VectorSource};
///
/// let dataset = GeoJsonDirectory::open("data/primary")?;
/// let layers = dataset.layer_names()?;
/// let set = dataset.read_layer(&layers[0])?;
/// # Ok::<(), regiomap::dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeoJsonDirectory {
    root: PathBuf,
    name_key: String,
}

impl GeoJsonDirectory {
    /// Open a dataset directory, verifying it exists.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DatasetError::MissingDataset { path: root });
        }
        Ok(Self {
            root,
            name_key: DEFAULT_NAME_KEY.to_string(),
        })
    }

    /// Use a different attribute key for the region name.
    pub fn with_name_key(mut self, key: impl Into<String>) -> Self {
        self.name_key = key.into();
        self
    }

    fn layer_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.geojson"))
    }

    fn parse_layer(&self, path: &Path) -> Result<GeometrySet, DatasetError> {
        let content = fs::read_to_string(path).map_err(|e| DatasetError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let geojson: GeoJson = content.parse().map_err(|e: geojson::Error| {
            DatasetError::ParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(DatasetError::ParseFailed {
                    path: path.to_path_buf(),
                    message: "expected a FeatureCollection".to_string(),
                })
            }
        };

        let mut features = Vec::with_capacity(collection.features.len());
        for gj_feature in collection.features {
            let Some(gj_geometry) = gj_feature.geometry else {
                warn!(path = %path.display(), "skipping feature without geometry");
                continue;
            };
            let geometry =
                Geometry::<f64>::try_from(gj_geometry).map_err(|e| DatasetError::ParseFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
            let properties = gj_feature.properties.unwrap_or_default();
            let name = match properties.get(&self.name_key) {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };
            features.push(Feature {
                geometry,
                name,
                properties,
            });
        }

        debug!(path = %path.display(), features = features.len(), "read layer");
        Ok(GeometrySet::new(Crs::WGS84, features))
    }
}

impl VectorSource for GeoJsonDirectory {
    fn layer_names(&self) -> Result<Vec<String>, DatasetError> {
        let entries = fs::read_dir(&self.root).map_err(|e| DatasetError::ReadFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DatasetError::ReadFailed {
                path: self.root.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("geojson") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_layer(&self, name: &str) -> Result<GeometrySet, DatasetError> {
        let path = self.layer_path(name);
        if !path.is_file() {
            return Err(DatasetError::MissingLayer {
                layer: name.to_string(),
                dataset: self.root.clone(),
            });
        }
        self.parse_layer(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_layer(dir: &Path, name: &str, body: &str) {
        let mut file = fs::File::create(dir.join(format!("{name}.geojson"))).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    fn square_collection(name: &str) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature",
                  "properties": {{"NAME_1": "{name}", "population": 12345}},
                  "geometry": {{"type": "Polygon", "coordinates":
                    [[[9.0, 47.0], [11.0, 47.0], [11.0, 49.0], [9.0, 49.0], [9.0, 47.0]]]}}}}
            ]}}"#
        )
    }

    #[test]
    fn test_open_missing_directory() {
        let err = GeoJsonDirectory::open("/definitely/not/here").unwrap_err();
        assert!(matches!(err, DatasetError::MissingDataset { .. }));
    }

    #[test]
    fn test_layer_names_sorted() {
        let dir = TempDir::new().unwrap();
        write_layer(dir.path(), "districts", &square_collection("B"));
        write_layer(dir.path(), "boundaries", &square_collection("A"));
        fs::write(dir.path().join("notes.txt"), "not a layer").unwrap();

        let dataset = GeoJsonDirectory::open(dir.path()).unwrap();
        assert_eq!(dataset.layer_names().unwrap(), vec!["boundaries", "districts"]);
    }

    #[test]
    fn test_read_layer_extracts_names_and_properties() {
        let dir = TempDir::new().unwrap();
        write_layer(dir.path(), "districts", &square_collection("Tirol"));

        let dataset = GeoJsonDirectory::open(dir.path()).unwrap();
        let set = dataset.read_layer("districts").unwrap();

        assert_eq!(*set.crs(), Crs::WGS84);
        assert_eq!(set.len(), 1);
        assert_eq!(set.features()[0].name.as_deref(), Some("Tirol"));
        assert_eq!(
            set.features()[0].properties.get("population"),
            Some(&serde_json::json!(12345))
        );
    }

    #[test]
    fn test_read_missing_layer() {
        let dir = TempDir::new().unwrap();
        let dataset = GeoJsonDirectory::open(dir.path()).unwrap();
        let err = dataset.read_layer("nope").unwrap_err();
        assert!(matches!(err, DatasetError::MissingLayer { layer, .. } if layer == "nope"));
    }

    #[test]
    fn test_read_invalid_json() {
        let dir = TempDir::new().unwrap();
        write_layer(dir.path(), "broken", "{ this is not geojson");

        let dataset = GeoJsonDirectory::open(dir.path()).unwrap();
        let err = dataset.read_layer("broken").unwrap_err();
        assert!(matches!(err, DatasetError::ParseFailed { .. }));
    }

    #[test]
    fn test_custom_name_key() {
        let dir = TempDir::new().unwrap();
        write_layer(
            dir.path(),
            "states",
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature",
                 "properties": {"GEN": "Sachsen"},
                 "geometry": {"type": "Point", "coordinates": [13.7, 51.0]}}
            ]}"#,
        );

        let dataset = GeoJsonDirectory::open(dir.path())
            .unwrap()
            .with_name_key("GEN");
        let set = dataset.read_layer("states").unwrap();
        assert_eq!(set.features()[0].name.as_deref(), Some("Sachsen"));
    }
}
