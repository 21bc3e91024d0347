//! Adapters between a per-frame object detector and an external
//! multi-object tracker.
//!
//! Detections go in as corner boxes with free-form labels, are reshaped into
//! the tracker's center-box arrays, and come back as [`DrawableBox`]es with
//! persistent track ids. The tracker itself sits behind
//! [`MultiObjectTracker`]; this crate never looks at its state.
//!
//! [`SpeedEstimator`] turns tracked boxes into ground speeds using the
//! pixel-to-geo mapping from `highway-core`.

mod detection;
mod output;
mod speed;
mod tracker;

pub use detection::{
    corner_to_center, first_label_token, DetectionAdapter, RawDetection, TrackerInput,
};
pub use output::{DrawableBox, TrackOutputAdapter, TrackerRecord};
pub use speed::{BoxAnchor, SpeedError, SpeedEstimator, SpeedParams, TrackSpeed};
pub use tracker::{FrameTracker, MultiObjectTracker};
