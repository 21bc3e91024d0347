//! Ground distance between pixels via great-circle distance.

use crate::{GeoMapper, GeoPoint, PixelPoint};
use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), in meters.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// How the two components of a [`GeoPoint`] are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoAxisOrder {
    /// `x` is latitude, `y` is longitude.
    #[default]
    LatLon,
    /// `x` is longitude, `y` is latitude.
    LonLat,
}

impl GeoAxisOrder {
    /// Split a geo point into `(latitude, longitude)` degrees.
    #[inline]
    pub fn lat_lon(self, g: GeoPoint) -> (f64, f64) {
        match self {
            GeoAxisOrder::LatLon => (g.x, g.y),
            GeoAxisOrder::LonLat => (g.y, g.x),
        }
    }
}

/// Haversine distance in meters between two geo points given in degrees.
pub fn haversine_m(a: GeoPoint, b: GeoPoint, order: GeoAxisOrder) -> f64 {
    let (lat1, lon1) = order.lat_lon(a);
    let (lat2, lon2) = order.lat_lon(b);
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();

    let s = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * s.sqrt().min(1.0).asin()
}

/// Real-world distance between pixel locations of one fixed camera.
///
/// Both points should lie inside (or close to) the calibration quadrilateral;
/// the homography is only a local model of the ground plane and the error
/// grows quickly when extrapolating.
#[derive(Clone, Debug)]
pub struct DistanceEstimator {
    mapper: GeoMapper,
    order: GeoAxisOrder,
}

impl DistanceEstimator {
    pub fn new(mapper: GeoMapper, order: GeoAxisOrder) -> Self {
        Self { mapper, order }
    }

    pub fn mapper(&self) -> &GeoMapper {
        &self.mapper
    }

    pub fn axis_order(&self) -> GeoAxisOrder {
        self.order
    }

    /// Geographic position of a pixel.
    #[inline]
    pub fn locate(&self, p: PixelPoint) -> GeoPoint {
        self.mapper.pixel_to_geo(p)
    }

    /// Ground distance in meters between two pixels.
    pub fn distance(&self, a: PixelPoint, b: PixelPoint) -> f64 {
        haversine_m(self.locate(a), self.locate(b), self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{highway_geo, highway_mapper, highway_pixels};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn estimator() -> DistanceEstimator {
        DistanceEstimator::new(highway_mapper(), GeoAxisOrder::LatLon)
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_m(
            Point2::new(0.0, 10.0),
            Point2::new(1.0, 10.0),
            GeoAxisOrder::LatLon,
        );
        assert_relative_eq!(d, EARTH_MEAN_RADIUS_M * 1.0_f64.to_radians(), max_relative = 1e-12);
    }

    #[test]
    fn axis_order_swaps_components() {
        let a = Point2::new(39.75, 116.51);
        let b = Point2::new(39.76, 116.52);
        let swapped = |p: Point2<f64>| Point2::new(p.y, p.x);
        assert_eq!(
            haversine_m(a, b, GeoAxisOrder::LatLon),
            haversine_m(swapped(a), swapped(b), GeoAxisOrder::LonLat)
        );
    }

    #[test]
    fn calibration_edge_matches_haversine_of_geo_corners() {
        let est = estimator();
        let px = highway_pixels();
        let geo = highway_geo();

        let d = est.distance(px[0], px[1]);
        let reference = haversine_m(geo[0], geo[1], GeoAxisOrder::LatLon);
        assert!(d > 0.0);
        assert!(d < 10.0, "expected a few meters, got {d}");
        assert_relative_eq!(d, reference, max_relative = 1e-6);
    }

    #[test]
    fn distance_is_symmetric_and_non_negative() {
        let est = estimator();
        let pts = [
            Point2::new(2417.0, 8094.0),
            Point2::new(6258.0, 8310.0),
            Point2::new(4000.0, 5000.0),
            Point2::new(4800.0, 2500.0),
        ];
        for &a in &pts {
            assert_eq!(est.distance(a, a), 0.0);
            for &b in &pts {
                let ab = est.distance(a, b);
                assert!(ab >= 0.0);
                assert_relative_eq!(ab, est.distance(b, a), max_relative = 1e-12);
            }
        }
    }
}
