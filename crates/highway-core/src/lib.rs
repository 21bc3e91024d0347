//! Geometry core for fixed-camera traffic measurement.
//!
//! Maps camera pixels to geographic coordinates (and back) through a planar
//! homography solved from four calibration points, and turns pixel pairs into
//! ground distances in meters. Nothing here depends on an image type or on
//! the tracker.

mod config;
mod distance;
mod error;
mod homography;
mod logger;
mod mapper;

pub use config::{CalibrationConfig, IoError};
pub use distance::{haversine_m, DistanceEstimator, GeoAxisOrder, EARTH_MEAN_RADIUS_M};
pub use error::GeoError;
pub use homography::{homography_from_4pt, Homography};
pub use mapper::{GeoMapper, GeoPoint, PixelPoint};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

#[cfg(test)]
mod test_support {
    use crate::{CalibrationConfig, GeoMapper, GeoPoint, PixelPoint};
    use nalgebra::Point2;

    fn points(v: &[[f64; 2]]) -> [Point2<f64>; 4] {
        std::array::from_fn(|i| Point2::new(v[i][0], v[i][1]))
    }

    pub(crate) fn highway_pixels() -> [PixelPoint; 4] {
        points(&CalibrationConfig::highway_default().pixel)
    }

    pub(crate) fn highway_geo() -> [GeoPoint; 4] {
        points(&CalibrationConfig::highway_default().geo)
    }

    pub(crate) fn highway_mapper() -> GeoMapper {
        GeoMapper::new(highway_pixels(), highway_geo()).expect("highway calibration is valid")
    }
}
