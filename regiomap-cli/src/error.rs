//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and an appropriate exit code.

use std::fmt;
use std::process;

use regiomap::config::ConfigError;
use regiomap::crs::ProjectionError;
use regiomap::dataset::DatasetError;
use regiomap::render::RenderError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging.
    LoggingInit(std::io::Error),
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// The requested region is not configured.
    UnknownRegion {
        /// What was requested.
        region: String,
        /// What the configuration offers.
        available: Vec<String>,
    },
    /// A configured CRS identifier did not parse.
    Crs(ProjectionError),
    /// Source layers could not be read.
    Dataset(DatasetError),
    /// Every render iteration failed.
    Render(RenderError),
    /// An output file could not be written.
    FileWrite {
        /// Target path.
        path: String,
        /// Underlying I/O error.
        error: std::io::Error,
    },
}

impl CliError {
    /// Exit the process with an error message and code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::UnknownRegion { available, .. } = self {
            eprintln!();
            eprintln!("Configured regions:");
            for name in available {
                eprintln!("  {name}");
            }
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "failed to initialize logging: {e}"),
            CliError::Config(e) => write!(f, "{e}"),
            CliError::UnknownRegion { region, .. } => {
                write!(f, "region '{region}' is not configured")
            }
            CliError::Crs(e) => write!(f, "{e}"),
            CliError::Dataset(e) => write!(f, "{e}"),
            CliError::Render(e) => write!(f, "rendering failed: {e}"),
            CliError::FileWrite { path, error } => {
                write!(f, "failed to write '{path}': {error}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Crs(e) => Some(e),
            CliError::Dataset(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::UnknownRegion { .. } => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        CliError::Dataset(e)
    }
}

impl From<ProjectionError> for CliError {
    fn from(e: ProjectionError) -> Self {
        CliError::Crs(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}
