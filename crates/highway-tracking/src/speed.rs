//! Ground speed of tracked objects from consecutive observations.

use crate::DrawableBox;
use highway_core::{DistanceEstimator, PixelPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Point of a box taken as the object's position on the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxAnchor {
    /// Middle of the bottom edge.
    #[default]
    BottomCenter,
    Center,
}

impl BoxAnchor {
    pub fn point(self, b: &DrawableBox) -> PixelPoint {
        match self {
            BoxAnchor::BottomCenter => b.bottom_center(),
            BoxAnchor::Center => b.center(),
        }
    }
}

fn default_fps() -> f64 {
    25.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedParams {
    /// Frame rate of the video, used to turn frame gaps into seconds.
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub anchor: BoxAnchor,
}

impl Default for SpeedParams {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            anchor: BoxAnchor::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpeedError {
    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFps(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSpeed {
    pub track_id: u64,
    /// Ground distance covered since the previous observation.
    pub meters: f64,
    /// Time between the two observations.
    pub seconds: f64,
    pub meters_per_second: f64,
}

impl TrackSpeed {
    pub fn km_per_hour(&self) -> f64 {
        self.meters_per_second * 3.6
    }
}

/// Estimates per-track speed from the boxes of successive frames.
///
/// Keeps the last ground point of every track seen in the most recent frame.
/// Tracks missing from a frame are forgotten.
#[derive(Clone, Debug)]
pub struct SpeedEstimator {
    distance: DistanceEstimator,
    params: SpeedParams,
    last: HashMap<u64, (u64, PixelPoint)>,
}

impl SpeedEstimator {
    pub fn new(distance: DistanceEstimator, params: SpeedParams) -> Result<Self, SpeedError> {
        if !(params.fps.is_finite() && params.fps > 0.0) {
            return Err(SpeedError::InvalidFps(params.fps));
        }
        Ok(Self {
            distance,
            params,
            last: HashMap::new(),
        })
    }

    pub fn params(&self) -> &SpeedParams {
        &self.params
    }

    /// Number of tracks with a stored position.
    pub fn tracked(&self) -> usize {
        self.last.len()
    }

    pub fn reset(&mut self) {
        self.last.clear();
    }

    /// Record the boxes of frame `frame_index` and return the speed of every
    /// track that was also present in the previous observation.
    ///
    /// A frame index that does not increase for a track restarts its history.
    /// When a track id appears more than once in `boxes`, only its first box
    /// is used.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, boxes), fields(boxes = boxes.len()))
    )]
    pub fn observe(&mut self, frame_index: u64, boxes: &[DrawableBox]) -> Vec<TrackSpeed> {
        let mut next = HashMap::with_capacity(boxes.len());
        let mut speeds = Vec::new();

        for b in boxes {
            if next.contains_key(&b.track_id) {
                log::warn!(
                    "track {}: repeated in frame {}, keeping the first box",
                    b.track_id,
                    frame_index
                );
                continue;
            }
            let here = self.params.anchor.point(b);
            if let Some(&(prev_frame, prev)) = self.last.get(&b.track_id) {
                if frame_index > prev_frame {
                    let meters = self.distance.distance(prev, here);
                    let seconds = (frame_index - prev_frame) as f64 / self.params.fps;
                    speeds.push(TrackSpeed {
                        track_id: b.track_id,
                        meters,
                        seconds,
                        meters_per_second: meters / seconds,
                    });
                } else {
                    log::warn!(
                        "track {}: frame {} does not follow frame {}, restarting",
                        b.track_id,
                        frame_index,
                        prev_frame
                    );
                }
            }
            next.insert(b.track_id, (frame_index, here));
        }

        self.last = next;
        speeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use highway_core::CalibrationConfig;
    use nalgebra::Point2;

    fn distance() -> DistanceEstimator {
        CalibrationConfig::highway_default()
            .build_estimator()
            .expect("highway calibration")
    }

    fn bx(track_id: u64, cx: f32, bottom: f32) -> DrawableBox {
        DrawableBox {
            x1: cx - 50.0,
            y1: bottom - 120.0,
            x2: cx + 50.0,
            y2: bottom,
            track_id,
        }
    }

    #[test]
    fn rejects_bad_frame_rates() {
        for fps in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let params = SpeedParams {
                fps,
                ..SpeedParams::default()
            };
            assert!(SpeedEstimator::new(distance(), params).is_err());
        }
    }

    #[test]
    fn first_sighting_has_no_speed() {
        let mut est = SpeedEstimator::new(distance(), SpeedParams::default()).expect("valid");
        assert!(est.observe(0, &[bx(1, 4000.0, 6000.0)]).is_empty());
        assert_eq!(est.tracked(), 1);
    }

    #[test]
    fn speed_follows_ground_distance_and_frame_gap() {
        let dist = distance();
        let mut est = SpeedEstimator::new(dist.clone(), SpeedParams::default()).expect("valid");

        let a = bx(3, 4000.0, 6000.0);
        let b = bx(3, 4100.0, 5600.0);
        est.observe(10, &[a]);
        let speeds = est.observe(12, &[b]);

        assert_eq!(speeds.len(), 1);
        let s = speeds[0];
        let meters = dist.distance(a.bottom_center(), b.bottom_center());
        assert_eq!(s.track_id, 3);
        assert_relative_eq!(s.meters, meters);
        assert_relative_eq!(s.seconds, 2.0 / 25.0);
        assert_relative_eq!(s.meters_per_second, meters * 12.5);
        assert_relative_eq!(s.km_per_hour(), meters * 12.5 * 3.6);
    }

    #[test]
    fn center_anchor_uses_box_center() {
        let dist = distance();
        let params = SpeedParams {
            fps: 10.0,
            anchor: BoxAnchor::Center,
        };
        let mut est = SpeedEstimator::new(dist.clone(), params).expect("valid");
        let a = bx(1, 4000.0, 6000.0);
        let b = bx(1, 4000.0, 5000.0);
        est.observe(0, &[a]);
        let s = est.observe(1, &[b]);
        assert_relative_eq!(s[0].meters, dist.distance(a.center(), b.center()));
        assert_eq!(a.center(), Point2::new(4000.0, 5940.0));
    }

    #[test]
    fn missing_tracks_are_forgotten() {
        let mut est = SpeedEstimator::new(distance(), SpeedParams::default()).expect("valid");
        est.observe(0, &[bx(1, 4000.0, 6000.0), bx(2, 3000.0, 7000.0)]);
        est.observe(1, &[bx(2, 3010.0, 6990.0)]);
        assert_eq!(est.tracked(), 1);

        let speeds = est.observe(2, &[bx(1, 4000.0, 5900.0)]);
        assert!(speeds.is_empty());
    }

    #[test]
    fn stale_frame_index_restarts_track() {
        let mut est = SpeedEstimator::new(distance(), SpeedParams::default()).expect("valid");
        est.observe(5, &[bx(1, 4000.0, 6000.0)]);
        assert!(est.observe(5, &[bx(1, 4000.0, 5900.0)]).is_empty());
        assert_eq!(est.observe(6, &[bx(1, 4000.0, 5800.0)]).len(), 1);

        est.reset();
        assert_eq!(est.tracked(), 0);
    }

    #[test]
    fn repeated_track_id_keeps_first_box() {
        let dist = distance();
        let mut est = SpeedEstimator::new(dist.clone(), SpeedParams::default()).expect("valid");

        let a = bx(1, 4000.0, 6000.0);
        let first = bx(1, 4000.0, 5900.0);
        let repeat = bx(1, 3000.0, 7000.0);
        est.observe(0, &[a]);
        let speeds = est.observe(1, &[first, repeat]);
        assert_eq!(speeds.len(), 1);
        assert_relative_eq!(
            speeds[0].meters,
            dist.distance(a.bottom_center(), first.bottom_center()),
            max_relative = 1e-12
        );
        assert_eq!(est.tracked(), 1);

        // the repeat was not stored either
        let next = bx(1, 4000.0, 5800.0);
        let speeds = est.observe(2, &[next]);
        assert_relative_eq!(
            speeds[0].meters,
            dist.distance(first.bottom_center(), next.bottom_center()),
            max_relative = 1e-12
        );
    }
}
