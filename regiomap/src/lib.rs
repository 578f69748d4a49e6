//! Regiomap - styled territory maps across projections
//!
//! This library renders map images of a primary territory plus optional
//! neighboring territories, with region exclusion and highlighting, across
//! one or more target coordinate reference systems, exporting fixed-pixel
//! raster and vector images.
//!
//! # Pipeline
//!
//! ```ignore
//! use regiomap::compose::compose_bundle;
//! use regiomap::crs::{BuiltinTransformer, Crs};
//! use regiomap::dataset::GeoJsonDirectory;
//! use regiomap::render::{render_all, RenderRequest};
//!
//! let primary = GeoJsonDirectory::open("data/primary")?;
//! let secondary = GeoJsonDirectory::open("data/secondary")?;
//! let bundle = compose_bundle(&primary, &layers, &secondary, &[], &forbidden, &wanted)?;
//!
//! let request = RenderRequest::new("austria", vec![Crs::from_epsg(3035)]);
//! let run = render_all(&bundle, &BuiltinTransformer::new(), &request)?;
//! ```

pub mod compose;
pub mod config;
pub mod crs;
pub mod dataset;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod scalebar;
pub mod viewport;

/// Version of the regiomap library and CLI.
///
/// Synchronized across all workspace members; defined in `Cargo.toml` and
/// injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
