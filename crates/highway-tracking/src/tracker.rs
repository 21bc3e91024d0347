//! Per-frame glue between the detector output and an external tracker.

use crate::{DetectionAdapter, DrawableBox, RawDetection, TrackOutputAdapter, TrackerRecord};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A stateful multi-object tracker (e.g. DeepSORT) driven once per frame.
///
/// Implementations keep all cross-frame state: motion models, appearance
/// galleries, track ages. They must be called for every frame, including
/// frames without detections, so that unmatched tracks can age out.
pub trait MultiObjectTracker {
    /// Frame type handed to the tracker for appearance features.
    type Image: ?Sized;
    type Error;

    /// Advance the tracker by one frame.
    ///
    /// `boxes_xywh`, `confidences` and `class_ids` are index-aligned and have
    /// equal length.
    fn update(
        &mut self,
        boxes_xywh: &[[f32; 4]],
        confidences: &[f32],
        class_ids: &[String],
        image: &Self::Image,
    ) -> Result<Vec<TrackerRecord>, Self::Error>;
}

impl<T: MultiObjectTracker + ?Sized> MultiObjectTracker for Box<T> {
    type Image = T::Image;
    type Error = T::Error;

    fn update(
        &mut self,
        boxes_xywh: &[[f32; 4]],
        confidences: &[f32],
        class_ids: &[String],
        image: &Self::Image,
    ) -> Result<Vec<TrackerRecord>, Self::Error> {
        (**self).update(boxes_xywh, confidences, class_ids, image)
    }
}

/// Runs detection adaptation, the tracker update and output adaptation for
/// each frame.
///
/// The tracker is owned exclusively; `update_frame` takes `&mut self`, so
/// frames are processed one at a time in call order.
#[derive(Debug)]
pub struct FrameTracker<T> {
    tracker: T,
    detections: DetectionAdapter,
    outputs: TrackOutputAdapter,
}

impl<T: MultiObjectTracker> FrameTracker<T> {
    pub fn new(tracker: T) -> Self {
        Self::with_detection_adapter(tracker, DetectionAdapter::default())
    }

    pub fn with_detection_adapter(tracker: T, detections: DetectionAdapter) -> Self {
        Self {
            tracker,
            detections,
            outputs: TrackOutputAdapter,
        }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn into_inner(self) -> T {
        self.tracker
    }

    /// Track one frame. Tracker errors are returned unchanged.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, image, detections), fields(detections = detections.len()))
    )]
    pub fn update_frame(
        &mut self,
        image: &T::Image,
        detections: &[RawDetection],
    ) -> Result<Vec<DrawableBox>, T::Error> {
        let input = self.detections.adapt(detections);
        let records = self.tracker.update(
            &input.boxes_xywh,
            &input.confidences,
            &input.class_ids,
            image,
        )?;
        let boxes = self.outputs.adapt(&records);
        log::debug!(
            "frame: {} detections -> {} tracked boxes",
            input.len(),
            boxes.len()
        );
        Ok(boxes)
    }
}
