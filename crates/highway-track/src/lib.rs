//! High-level facade crate for the `highway-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry core and the tracking adapters
//! - JSON reports for offline speed estimation
//! - (feature `cli`) the `highway-track` command-line tool
//!
//! ## Quickstart
//!
//! ```
//! use highway_track::core::CalibrationConfig;
//! use nalgebra::Point2;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let estimator = CalibrationConfig::highway_default().build_estimator()?;
//! let meters = estimator.distance(Point2::new(2417.0, 8094.0), Point2::new(6258.0, 8310.0));
//! assert!(meters > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `highway_track::core`: homography, pixel ↔ geo mapping, distances, calibration config.
//! - `highway_track::tracking`: detection/track adapters, `FrameTracker`, speeds.
//! - `highway_track::report`: frame and speed report JSON files.

pub use highway_core as core;
pub use highway_tracking as tracking;

pub use highway_core::{CalibrationConfig, DistanceEstimator, GeoMapper};
pub use highway_tracking::{DrawableBox, FrameTracker, MultiObjectTracker, RawDetection};

pub mod report;
