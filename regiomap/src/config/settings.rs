//! Settings structs for all configuration sections.
//!
//! Each struct represents one object of the JSON config file. These are
//! pure data types; parsing lives in [`super::file`] and interpretation in
//! the components that receive them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::dataset::DEFAULT_NAME_KEY;
use crate::render::Rgba;

/// Complete application configuration loaded from `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// Dataset and output locations.
    #[serde(default)]
    pub paths: PathSettings,
    /// Output pixel size and DPI.
    pub map: MapSizeSettings,
    /// Layer colors.
    #[serde(default)]
    pub colors: ColorSettings,
    /// Region name to target CRS identifier list.
    pub regions: BTreeMap<String, Vec<String>>,
    /// Primary dataset layers to merge, in draw order.
    pub primary_layers: Vec<String>,
    /// Secondary dataset layers; empty means every layer of the secondary
    /// dataset.
    #[serde(default)]
    pub secondary_layers: Vec<String>,
    /// Regions removed from the primary layer and from highlight
    /// eligibility.
    #[serde(default)]
    pub exclusion: ExclusionSettings,
    /// Regions drawn with emphasis styling.
    #[serde(default)]
    pub highlight: HighlightSettings,
    /// Scale bar options.
    #[serde(default)]
    pub scale_bar: ScaleBarSettings,
    /// Background styling.
    #[serde(default)]
    pub background: BackgroundSettings,
    /// Export formats, one image per entry.
    #[serde(default = "default_formats")]
    pub export_formats: Vec<String>,
    /// Attribute key carrying the region name.
    #[serde(default = "default_name_key")]
    pub name_attribute: String,
}

impl MapConfig {
    /// CRS identifier list for a region, if the region is configured.
    pub fn region_crs(&self, region: &str) -> Option<&[String]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    /// Configured region names, sorted.
    pub fn region_names(&self) -> Vec<&str> {
        self.regions.keys().map(String::as_str).collect()
    }
}

/// Dataset and output directories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Primary territory dataset directory.
    pub primary: PathBuf,
    /// Neighboring territories dataset directory.
    pub secondary: PathBuf,
    /// Where rendered images are written.
    pub output: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("data/primary"),
            secondary: PathBuf::from("data/secondary"),
            output: PathBuf::from("output"),
        }
    }
}

/// Output pixel size and DPI.
#[derive(Debug, Clone, Deserialize)]
pub struct MapSizeSettings {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Dots per inch; affects stroke and glyph scaling only, never the
    /// pixel footprint.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

/// Layer colors, hex notation in the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Primary territory fill.
    pub primary: Rgba,
    /// Neighboring territory fill.
    pub secondary: Rgba,
    /// Border stroke.
    pub border: Rgba,
    /// Highlight fill.
    pub highlight: Rgba,
    /// Border stroke width in points.
    pub border_width: f32,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            primary: Rgba::opaque(0xd9, 0xd9, 0xd9),
            secondary: Rgba::opaque(0xf0, 0xf0, 0xf0),
            border: Rgba::opaque(0x40, 0x40, 0x40),
            highlight: Rgba::opaque(0xe4, 0x6c, 0x0a),
            border_width: 1.0,
        }
    }
}

/// Regions removed from the primary layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExclusionSettings {
    /// Whether exclusion is applied at all.
    pub active: bool,
    /// Region names to remove.
    pub names: Vec<String>,
}

impl ExclusionSettings {
    /// The forbidden-name set; empty when exclusion is inactive.
    pub fn forbidden(&self) -> std::collections::HashSet<String> {
        if self.active {
            self.names.iter().cloned().collect()
        } else {
            Default::default()
        }
    }
}

/// Regions drawn with emphasis styling.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Whether highlighting is applied at all.
    pub active: bool,
    /// Region names to emphasize.
    pub names: Vec<String>,
}

impl HighlightSettings {
    /// The highlight wish list; empty when highlighting is inactive.
    pub fn wanted(&self) -> &[String] {
        if self.active {
            &self.names
        } else {
            &[]
        }
    }
}

/// Scale bar configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScaleBarSettings {
    /// Whether the bar is drawn.
    pub show: bool,
    /// Placement: `bottom-left`, `bottom-center` or `bottom-right`.
    pub position: String,
    /// Target bar length as a fraction of the viewport width.
    pub length_fraction: f64,
    /// Bar and label color.
    pub color: Rgba,
    /// Bar line width in points.
    pub line_width: f32,
    /// Label glyph height in points.
    pub font_size: f32,
}

impl Default for ScaleBarSettings {
    fn default() -> Self {
        Self {
            show: true,
            position: "bottom-left".to_string(),
            length_fraction: 0.1,
            color: Rgba::WHITE,
            line_width: 1.5,
            font_size: 8.0,
        }
    }
}

/// Background styling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    /// Transparent background; `color` is ignored when set.
    pub transparent: bool,
    /// Opaque background color.
    pub color: Rgba,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            transparent: true,
            color: Rgba::WHITE,
        }
    }
}

fn default_formats() -> Vec<String> {
    vec!["png".to_string(), "svg".to_string()]
}

fn default_name_key() -> String {
    DEFAULT_NAME_KEY.to_string()
}

fn default_dpi() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "map": {"width": 1600, "height": 1200},
        "regions": {"austria": ["EPSG:3035", "EPSG:25832"]},
        "primary_layers": ["states"]
    }"#;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: MapConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(config.map.dpi, 100);
        assert_eq!(config.export_formats, vec!["png", "svg"]);
        assert_eq!(config.name_attribute, "NAME_1");
        assert!(config.scale_bar.show);
        assert!(config.background.transparent);
        assert!(!config.exclusion.active);
        assert_eq!(config.paths.output, PathBuf::from("output"));
    }

    #[test]
    fn test_region_lookup() {
        let config: MapConfig = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(
            config.region_crs("austria"),
            Some(&["EPSG:3035".to_string(), "EPSG:25832".to_string()][..])
        );
        assert_eq!(config.region_crs("atlantis"), None);
        assert_eq!(config.region_names(), vec!["austria"]);
    }

    #[test]
    fn test_inactive_exclusion_yields_empty_set() {
        let settings = ExclusionSettings {
            active: false,
            names: vec!["Tirol".to_string()],
        };
        assert!(settings.forbidden().is_empty());

        let settings = ExclusionSettings {
            active: true,
            names: vec!["Tirol".to_string()],
        };
        assert!(settings.forbidden().contains("Tirol"));
    }

    #[test]
    fn test_inactive_highlight_yields_empty_list() {
        let settings = HighlightSettings {
            active: false,
            names: vec!["Wien".to_string()],
        };
        assert!(settings.wanted().is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let json = r##"{
            "paths": {"primary": "d/p", "secondary": "d/s", "output": "out"},
            "map": {"width": 800, "height": 600, "dpi": 144},
            "colors": {
                "primary": "#aabbcc",
                "secondary": "#f0f0f0",
                "border": "#000000",
                "highlight": "#e46c0a",
                "border_width": 0.8
            },
            "regions": {"germany": ["EPSG:25832"]},
            "primary_layers": ["states", "districts"],
            "secondary_layers": ["countries"],
            "exclusion": {"active": true, "names": ["Bayern"]},
            "highlight": {"active": true, "names": ["Sachsen"]},
            "scale_bar": {
                "show": true,
                "position": "bottom-right",
                "length_fraction": 0.15,
                "color": "#333333",
                "line_width": 2.0,
                "font_size": 10.0
            },
            "background": {"transparent": false, "color": "#ffffff"},
            "export_formats": ["png"],
            "name_attribute": "GEN"
        }"##;
        let config: MapConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.map.dpi, 144);
        assert_eq!(config.colors.primary, Rgba::opaque(0xaa, 0xbb, 0xcc));
        assert_eq!(config.scale_bar.position, "bottom-right");
        assert_eq!(config.name_attribute, "GEN");
        assert!(!config.background.transparent);
    }
}
