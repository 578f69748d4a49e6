//! Vector dataset input.
//!
//! A [`VectorSource`] exposes named layers and reads each one into a
//! [`GeometrySet`]. The built-in [`GeoJsonDirectory`] treats a directory of
//! `.geojson` files as one dataset whose layers are the file stems. Sources
//! are read once per run; reprojection downstream never re-reads them.

mod geojson_dir;

pub use geojson_dir::GeoJsonDirectory;

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::GeometrySet;

/// Default attribute key carrying the region name.
pub const DEFAULT_NAME_KEY: &str = "NAME_1";

/// Errors raised while locating or reading vector data.
///
/// Any of these aborts the run before rendering starts; there is nothing
/// sensible to draw without the source layers.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset directory does not exist or is not a directory.
    #[error("dataset not found at {}", path.display())]
    MissingDataset {
        /// The path that was probed.
        path: PathBuf,
    },

    /// A named layer is absent from the dataset.
    #[error("layer '{layer}' not found in dataset {}", dataset.display())]
    MissingLayer {
        /// The requested layer name.
        layer: String,
        /// The dataset that was searched.
        dataset: PathBuf,
    },

    /// Reading a layer file failed.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A layer file exists but is not valid GeoJSON.
    #[error("failed to parse {}: {message}", path.display())]
    ParseFailed {
        /// The file that could not be parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

/// A dataset that can enumerate and read named vector layers.
pub trait VectorSource {
    /// Available layer names, sorted.
    fn layer_names(&self) -> Result<Vec<String>, DatasetError>;

    /// Read one named layer into a geometry set.
    fn read_layer(&self, name: &str) -> Result<GeometrySet, DatasetError>;
}
