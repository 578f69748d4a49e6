//! Application configuration.
//!
//! Pure-data settings structs mirroring the JSON configuration file, plus
//! the loader. Components never read global state; the CLI loads one
//! [`MapConfig`] and passes the relevant pieces into each stage explicitly.

mod file;
mod settings;

pub use file::{load_config, ConfigError};
pub use settings::{
    BackgroundSettings, ColorSettings, ExclusionSettings, HighlightSettings, MapConfig,
    MapSizeSettings, PathSettings, ScaleBarSettings,
};
