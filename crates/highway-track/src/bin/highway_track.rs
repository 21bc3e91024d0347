use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use highway_track::core::{CalibrationConfig, GeoError, IoError};
use highway_track::report::{SpeedReport, TrackedFrame};
use highway_track::tracking::{BoxAnchor, SpeedError, SpeedEstimator, SpeedParams};
use log::LevelFilter;
use nalgebra::Point2;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Speed(#[from] SpeedError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Parser, Debug)]
#[command(name = "highway-track", version, about = "Pixel/geo mapping and speeds for a fixed traffic camera")]
struct Cli {
    /// Log level for stderr output.
    #[arg(long, global = true, default_value = "warn", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Emit tracing output as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a pixel to geographic coordinates.
    Geo {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_pair)]
        pixel: Point2<f64>,
    },
    /// Map geographic coordinates to a pixel.
    Pixel {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_pair)]
        geo: Point2<f64>,
    },
    /// Ground distance in meters between two pixels.
    Distance {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_pair)]
        from: Point2<f64>,
        #[arg(long, value_parser = parse_pair)]
        to: Point2<f64>,
    },
    /// Per-track speeds from a JSON file of tracked frames.
    Speeds {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tracks: PathBuf,
        #[arg(long, default_value_t = 25.0)]
        fps: f64,
        /// Use the box center instead of the bottom edge as ground point.
        #[arg(long)]
        center: bool,
        /// Write the report here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the calibration corners and both solved transforms.
    Calibration {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the built-in highway calibration as JSON.
    InitConfig {
        #[arg(long)]
        out: PathBuf,
    },
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level `{s}`"))
}

fn parse_pair(s: &str) -> Result<Point2<f64>, String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `A,B`, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("`{}`: {e}", v.trim()))
    };
    Ok(Point2::new(parse(a)?, parse(b)?))
}

fn load_calibration(path: Option<&Path>) -> Result<CalibrationConfig, CliError> {
    match path {
        Some(p) => {
            log::info!("loading calibration from {}", p.display());
            Ok(CalibrationConfig::load_json(p)?)
        }
        None => Ok(CalibrationConfig::highway_default()),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(cli)))]
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Geo { config, pixel } => {
            let mapper = load_calibration(config.as_deref())?.build_mapper()?;
            let g = mapper.pixel_to_geo(pixel);
            print_json(&json!({ "pixel": [pixel.x, pixel.y], "geo": [g.x, g.y] }))
        }
        Command::Pixel { config, geo } => {
            let mapper = load_calibration(config.as_deref())?.build_mapper()?;
            let p = mapper.geo_to_pixel(geo);
            print_json(&json!({ "geo": [geo.x, geo.y], "pixel": [p.x, p.y] }))
        }
        Command::Distance { config, from, to } => {
            let estimator = load_calibration(config.as_deref())?.build_estimator()?;
            let meters = estimator.distance(from, to);
            print_json(&json!({ "from": [from.x, from.y], "to": [to.x, to.y], "meters": meters }))
        }
        Command::Speeds {
            config,
            tracks,
            fps,
            center,
            out,
        } => {
            let estimator = load_calibration(config.as_deref())?.build_estimator()?;
            let params = SpeedParams {
                fps,
                anchor: if center {
                    BoxAnchor::Center
                } else {
                    BoxAnchor::BottomCenter
                },
            };
            let mut speeds = SpeedEstimator::new(estimator, params)?;
            let frames = TrackedFrame::load_json(&tracks)?;
            log::info!("{} frames loaded from {}", frames.len(), tracks.display());

            let mut report = SpeedReport::build(&mut speeds, &frames);
            report.config_path = config.map(|p| p.to_string_lossy().into_owned());
            match out {
                Some(path) => Ok(report.write_json(path)?),
                None => print_json(&serde_json::to_value(&report)?),
            }
        }
        Command::Calibration { config } => {
            let mapper = load_calibration(config.as_deref())?.build_mapper()?;
            let pairs = |pts: &[Point2<f64>; 4]| pts.map(|p| [p.x, p.y]);
            print_json(&json!({
                "pixel": pairs(mapper.pixel_corners()),
                "geo": pairs(mapper.geo_corners()),
                "pixel_to_geo": mapper.forward().to_array(),
                "geo_to_pixel": mapper.inverse().to_array(),
            }))
        }
        Command::InitConfig { out } => {
            CalibrationConfig::highway_default().write_json(&out)?;
            log::info!("calibration written to {}", out.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    highway_track::core::init_tracing(cli.log_level, cli.log_json);
    #[cfg(not(feature = "tracing"))]
    if let Err(err) = highway_track::core::init_with_level(cli.log_level) {
        eprintln!("error: {}", CliError::from(err));
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
