//! JSON inputs and reports for offline speed estimation.

use crate::core::IoError;
use crate::tracking::{DrawableBox, SpeedEstimator, SpeedParams, TrackSpeed};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Tracked boxes of one video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedFrame {
    pub frame: u64,
    #[serde(default)]
    pub boxes: Vec<DrawableBox>,
}

impl TrackedFrame {
    /// Load a JSON array of frames from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<Self>, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSpeeds {
    pub frame: u64,
    pub speeds: Vec<TrackSpeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedReport {
    #[serde(default)]
    pub config_path: Option<String>,
    pub params: SpeedParams,
    pub num_frames: usize,
    /// Only frames with at least one speed are listed.
    pub frames: Vec<FrameSpeeds>,
}

impl SpeedReport {
    /// Feed `frames` to `estimator` in order and collect the speeds.
    pub fn build(estimator: &mut SpeedEstimator, frames: &[TrackedFrame]) -> Self {
        let speeds = frames
            .iter()
            .map(|f| FrameSpeeds {
                frame: f.frame,
                speeds: estimator.observe(f.frame, &f.boxes),
            })
            .filter(|f| !f.speeds.is_empty())
            .collect();
        Self {
            config_path: None,
            params: *estimator.params(),
            num_frames: frames.len(),
            frames: speeds,
        }
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
