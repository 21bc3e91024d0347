use serde::{Deserialize, Serialize};

/// One object reported by the detector for a single frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Corner box `[x1, y1, x2, y2]` in pixels.
    pub bbox: [f32; 4],
    /// Class label; may carry trailing annotation text, e.g. `"car 0.98"`.
    pub label: String,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(bbox: [f32; 4], label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }
}

/// Per-frame tracker input as three index-aligned arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerInput {
    /// Center boxes `[cx, cy, w, h]`.
    pub boxes_xywh: Vec<[f32; 4]>,
    pub confidences: Vec<f32>,
    pub class_ids: Vec<String>,
}

impl TrackerInput {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            boxes_xywh: Vec::with_capacity(n),
            confidences: Vec::with_capacity(n),
            class_ids: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes_xywh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes_xywh.is_empty()
    }
}

/// Converts a corner box `[x1, y1, x2, y2]` into a center box `[cx, cy, w, h]`.
#[inline]
pub fn corner_to_center([x1, y1, x2, y2]: [f32; 4]) -> [f32; 4] {
    [(x1 + x2) * 0.5, (y1 + y2) * 0.5, x2 - x1, y2 - y1]
}

/// Keeps the part of a detector label before its first space.
///
/// `"car 0.98"` becomes `"car"`; a label without spaces is returned unchanged.
pub fn first_label_token(label: &str) -> &str {
    match label.find(' ') {
        Some(end) => &label[..end],
        None => label,
    }
}

/// Reshapes raw detections into [`TrackerInput`].
#[derive(Clone, Copy, Debug)]
pub struct DetectionAdapter {
    normalize_label: fn(&str) -> &str,
}

impl Default for DetectionAdapter {
    fn default() -> Self {
        Self::new(first_label_token)
    }
}

impl DetectionAdapter {
    /// Adapter with a custom label normalization.
    pub fn new(normalize_label: fn(&str) -> &str) -> Self {
        Self { normalize_label }
    }

    pub fn class_id(&self, label: &str) -> String {
        (self.normalize_label)(label).to_owned()
    }

    pub fn adapt(&self, detections: &[RawDetection]) -> TrackerInput {
        let mut input = TrackerInput::with_capacity(detections.len());
        for det in detections {
            input.boxes_xywh.push(corner_to_center(det.bbox));
            input.confidences.push(det.confidence);
            input.class_ids.push(self.class_id(&det.label));
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_yields_empty_arrays() {
        let input = DetectionAdapter::default().adapt(&[]);
        assert!(input.is_empty());
        assert!(input.boxes_xywh.is_empty());
        assert!(input.confidences.is_empty());
        assert!(input.class_ids.is_empty());
    }

    #[test]
    fn boxes_become_center_boxes() {
        let dets = [
            RawDetection::new([10.0, 20.0, 50.0, 80.0], "car", 0.9),
            RawDetection::new([100.0, 100.0, 101.0, 103.0], "truck 0.5", 0.5),
        ];
        let input = DetectionAdapter::default().adapt(&dets);

        assert_eq!(input.len(), 2);
        assert_eq!(input.boxes_xywh[0], [30.0, 50.0, 40.0, 60.0]);
        assert_eq!(input.boxes_xywh[1], [100.5, 101.5, 1.0, 3.0]);
        assert_eq!(input.confidences, vec![0.9, 0.5]);
        assert_eq!(input.class_ids, vec!["car", "truck"]);
    }

    #[test]
    fn label_keeps_first_token() {
        assert_eq!(first_label_token("car 0.98"), "car");
        assert_eq!(first_label_token("bus"), "bus");
        assert_eq!(first_label_token("person  extra text"), "person");
        assert_eq!(first_label_token(" leading"), "");
        assert_eq!(first_label_token(""), "");
    }

    #[test]
    fn label_normalization_is_swappable() {
        fn whole(label: &str) -> &str {
            label
        }
        let adapter = DetectionAdapter::new(whole);
        let input = adapter.adapt(&[RawDetection::new([0.0; 4], "car 0.98", 1.0)]);
        assert_eq!(input.class_ids, vec!["car 0.98"]);
    }
}
