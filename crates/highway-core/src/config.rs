//! JSON calibration config for the pixel ↔ geo mapping.

use crate::{DistanceEstimator, GeoAxisOrder, GeoError, GeoMapper};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

fn to_points(v: &[[f64; 2]]) -> Vec<Point2<f64>> {
    v.iter().map(|&[x, y]| Point2::new(x, y)).collect()
}

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Four pixel points and the four geo points they correspond to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// `(x, y)` pixel coordinates.
    pub pixel: Vec<[f64; 2]>,
    /// Geo coordinates in the same order as `pixel`.
    pub geo: Vec<[f64; 2]>,
    #[serde(default)]
    pub axis_order: GeoAxisOrder,
}

impl CalibrationConfig {
    /// Calibration of the highway camera the tools were first deployed on.
    ///
    /// Geo points are `(latitude, longitude)`.
    pub fn highway_default() -> Self {
        Self {
            pixel: vec![
                [2417.0, 8094.0], // top left
                [6258.0, 8310.0], // top right
                [5320.0, 1827.0], // bottom left
                [4305.0, 1788.0], // bottom right
            ],
            geo: vec![
                [39.749918, 116.5162439],
                [39.7499493, 116.5162564],
                [39.7500739, 116.5156966],
                [39.7500426, 116.5156838],
            ],
            axis_order: GeoAxisOrder::LatLon,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn build_mapper(&self) -> Result<GeoMapper, GeoError> {
        GeoMapper::from_slices(&to_points(&self.pixel), &to_points(&self.geo))
    }

    pub fn build_estimator(&self) -> Result<DistanceEstimator, GeoError> {
        Ok(DistanceEstimator::new(self.build_mapper()?, self.axis_order))
    }
}
