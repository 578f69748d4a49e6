//! Configuration file loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::MapConfig;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid configuration in {}: {source}", path.display())]
    Invalid {
        /// The offending file.
        path: PathBuf,
        /// Parser diagnostic, including line and column.
        #[source]
        source: serde_json::Error,
    },
}

/// Load and parse a [`MapConfig`] from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<MapConfig, ConfigError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: MapConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!(path = %path.display(), regions = config.regions.len(), "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "map": {{"width": 1000, "height": 500}},
                "regions": {{"testland": ["EPSG:3857"]}},
                "primary_layers": ["states"]
            }}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.map.width, 1000);
        assert_eq!(config.region_names(), vec!["testland"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nope/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_required_section() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"regions": {{}}, "primary_layers": []}}"#).unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
