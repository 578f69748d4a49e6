//! Regiomap CLI - render styled territory maps across projections.
//!
//! Non-interactive front end: all selections (region, layers, exclusion,
//! highlight) come from the configuration file and flags, so the render
//! pipeline itself performs no prompting or I/O beyond reading datasets and
//! writing images.

mod error;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::warn;

use regiomap::compose::compose_bundle;
use regiomap::config::load_config;
use regiomap::crs::{BuiltinTransformer, Crs};
use regiomap::dataset::GeoJsonDirectory;
use regiomap::logging::{default_log_dir, default_log_file, init_logging};
use regiomap::render::{
    render_all, Background, ColorScheme, ExportFormat, FailurePolicy, RenderRequest, RenderTarget,
    ScaleBarRequest, ScaleBarStyle,
};
use regiomap::scalebar::ScaleBarOptions;

use error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Raster PNG with alpha channel
    Png,
    /// Vector SVG document
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Svg => ExportFormat::Svg,
        }
    }
}

#[derive(Parser)]
#[command(name = "regiomap")]
#[command(version = regiomap::VERSION)]
#[command(about = "Render styled territory maps across projections", long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Region to render (a key of the `regions` table in the configuration)
    #[arg(long)]
    region: String,

    /// Output directory (overrides the configured path)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Export format; may be given multiple times (overrides the
    /// configuration)
    #[arg(long = "format", value_enum)]
    formats: Vec<FormatArg>,

    /// Suppress the scale bar
    #[arg(long)]
    no_scale_bar: bool,

    /// Stop at the first projection failure instead of rendering the
    /// remaining CRSs
    #[arg(long)]
    fail_fast: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let _guard =
        init_logging(default_log_dir(), default_log_file()).map_err(CliError::LoggingInit)?;

    let config = load_config(&args.config)?;

    let crs_names = config
        .region_crs(&args.region)
        .ok_or_else(|| CliError::UnknownRegion {
            region: args.region.clone(),
            available: config
                .region_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })?;
    let crs_list = crs_names
        .iter()
        .map(|name| name.parse::<Crs>())
        .collect::<Result<Vec<_>, _>>()?;

    let primary = GeoJsonDirectory::open(&config.paths.primary)?
        .with_name_key(&config.name_attribute);
    let secondary = GeoJsonDirectory::open(&config.paths.secondary)?
        .with_name_key(&config.name_attribute);

    let forbidden = config.exclusion.forbidden();
    let bundle = compose_bundle(
        &primary,
        &config.primary_layers,
        &secondary,
        &config.secondary_layers,
        &forbidden,
        config.highlight.wanted(),
    )?;

    let formats = if args.formats.is_empty() {
        let (formats, _skipped) = RenderTarget::resolve_formats(&config.export_formats);
        formats
    } else {
        args.formats.iter().map(|f| ExportFormat::from(*f)).collect()
    };

    let scale_bar = if args.no_scale_bar || !config.scale_bar.show {
        None
    } else {
        let anchor = config
            .scale_bar
            .position
            .parse()
            .unwrap_or_else(|e: String| {
                warn!("{e}, falling back to bottom-left");
                Default::default()
            });
        Some(ScaleBarRequest {
            options: ScaleBarOptions {
                length_fraction: config.scale_bar.length_fraction,
                anchor,
            },
            style: ScaleBarStyle {
                color: config.scale_bar.color,
                line_width: config.scale_bar.line_width,
                font_size: config.scale_bar.font_size,
            },
        })
    };

    let request = RenderRequest {
        region: args.region.clone(),
        crs_list,
        target: RenderTarget {
            width: config.map.width,
            height: config.map.height,
            dpi: config.map.dpi,
            formats,
            background: if config.background.transparent {
                Background::Transparent
            } else {
                Background::Opaque(config.background.color)
            },
        },
        colors: ColorScheme {
            primary: config.colors.primary,
            secondary: config.colors.secondary,
            border: config.colors.border,
            highlight: config.colors.highlight,
        },
        border_width: config.colors.border_width,
        scale_bar,
        padding: regiomap::viewport::DEFAULT_PADDING,
        policy: if args.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        },
    };

    let run = render_all(&bundle, &BuiltinTransformer::new(), &request)?;

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.paths.output.clone());
    fs::create_dir_all(&output_dir).map_err(|e| CliError::FileWrite {
        path: output_dir.display().to_string(),
        error: e,
    })?;

    for image in &run.images {
        let path = output_dir.join(&image.file_name);
        fs::write(&path, &image.bytes).map_err(|e| CliError::FileWrite {
            path: path.display().to_string(),
            error: e,
        })?;
        println!("Saved {}", path.display());
    }

    for failure in &run.failures {
        eprintln!("Warning: {} failed: {}", failure.crs, failure.error);
    }

    if run.images.is_empty() {
        if let Some(failure) = run.failures.into_iter().next() {
            return Err(CliError::Render(failure.error));
        }
    }

    println!(
        "Rendered {} image(s) for region '{}'",
        run.images.len(),
        args.region
    );
    Ok(())
}
