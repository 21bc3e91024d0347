use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One object reported by the external tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerRecord {
    /// Corner box `[x1, y1, x2, y2]` in pixels.
    pub bbox: [f32; 4],
    /// Identity assigned and kept by the tracker across frames.
    pub track_id: u64,
}

/// Box of a currently tracked object, ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawableBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub track_id: u64,
}

impl DrawableBox {
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.x1 as f64 + self.x2 as f64) * 0.5,
            (self.y1 as f64 + self.y2 as f64) * 0.5,
        )
    }

    /// Middle of the bottom edge, where the object touches the ground.
    pub fn bottom_center(&self) -> Point2<f64> {
        Point2::new((self.x1 as f64 + self.x2 as f64) * 0.5, self.y2 as f64)
    }
}

impl From<TrackerRecord> for DrawableBox {
    fn from(r: TrackerRecord) -> Self {
        let [x1, y1, x2, y2] = r.bbox;
        Self {
            x1,
            y1,
            x2,
            y2,
            track_id: r.track_id,
        }
    }
}

/// Turns tracker records into [`DrawableBox`]es, keeping their order.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrackOutputAdapter;

impl TrackOutputAdapter {
    pub fn adapt(&self, records: &[TrackerRecord]) -> Vec<DrawableBox> {
        records.iter().copied().map(DrawableBox::from).collect()
    }
}
