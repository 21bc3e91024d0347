//! Pixel ↔ geographic coordinate mapping for a fixed camera.

use crate::homography::{homography_from_4pt, Homography};
use crate::GeoError;
use nalgebra::{DMatrix, Point2};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Point in camera pixel space, `(x, y)`.
pub type PixelPoint = Point2<f64>;

/// Point in geographic space. Component order follows the calibration data.
pub type GeoPoint = Point2<f64>;

/// Converts between pixel and geographic coordinates using a homography solved
/// from four calibration correspondences.
///
/// The four pixel points and the four geo points must be listed in the same
/// order (e.g. top-left, top-right, bottom-left, bottom-right). The mapping is
/// only accurate inside or close to the calibration quadrilateral.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoMapper {
    pixel: [PixelPoint; 4],
    geo: [GeoPoint; 4],
    forward: Homography,
    inverse: Homography,
}

impl GeoMapper {
    /// Solve the forward and inverse transforms for a 4-point correspondence.
    ///
    /// Each direction is its own normalized solve. Inverting the forward
    /// matrix instead loses about 1e-2 px, since its translation column is
    /// dominated by the absolute geo coordinates.
    pub fn new(pixel: [PixelPoint; 4], geo: [GeoPoint; 4]) -> Result<Self, GeoError> {
        let forward = homography_from_4pt(&pixel, &geo).ok_or(
            GeoError::DegenerateCorrespondence("three pixel points are collinear"),
        )?;
        let inverse = homography_from_4pt(&geo, &pixel).ok_or(
            GeoError::DegenerateCorrespondence("three geo points are collinear"),
        )?;

        log::debug!("geo mapper forward transform: {:?}", forward.to_array());
        log::debug!("geo mapper inverse transform: {:?}", inverse.to_array());

        Ok(Self {
            pixel,
            geo,
            forward,
            inverse,
        })
    }

    /// Build from point slices; both must contain exactly 4 points.
    pub fn from_slices(pixel: &[PixelPoint], geo: &[GeoPoint]) -> Result<Self, GeoError> {
        let invalid = || GeoError::InvalidCorrespondence {
            pixel: (pixel.len(), 2),
            geo: (geo.len(), 2),
        };
        let pixel: [PixelPoint; 4] = pixel.try_into().map_err(|_| invalid())?;
        let geo: [GeoPoint; 4] = geo.try_into().map_err(|_| invalid())?;
        Self::new(pixel, geo)
    }

    /// Build from two 4x2 matrices, one point per row.
    pub fn from_matrices(pixel: &DMatrix<f64>, geo: &DMatrix<f64>) -> Result<Self, GeoError> {
        if pixel.shape() != (4, 2) || geo.shape() != (4, 2) {
            return Err(GeoError::InvalidCorrespondence {
                pixel: pixel.shape(),
                geo: geo.shape(),
            });
        }
        let row_point = |m: &DMatrix<f64>, r: usize| Point2::new(m[(r, 0)], m[(r, 1)]);
        Self::new(
            std::array::from_fn(|r| row_point(pixel, r)),
            std::array::from_fn(|r| row_point(geo, r)),
        )
    }

    pub fn pixel_corners(&self) -> &[PixelPoint; 4] {
        &self.pixel
    }

    pub fn geo_corners(&self) -> &[GeoPoint; 4] {
        &self.geo
    }

    /// Pixel → geo transform.
    pub fn forward(&self) -> &Homography {
        &self.forward
    }

    /// Geo → pixel transform.
    pub fn inverse(&self) -> &Homography {
        &self.inverse
    }

    #[inline]
    pub fn pixel_to_geo(&self, p: PixelPoint) -> GeoPoint {
        self.forward.apply(p)
    }

    #[inline]
    pub fn geo_to_pixel(&self, g: GeoPoint) -> PixelPoint {
        self.inverse.apply(g)
    }

    pub fn pixel_to_geo_batch(&self, points: &[PixelPoint]) -> Vec<GeoPoint> {
        points.iter().map(|&p| self.pixel_to_geo(p)).collect()
    }

    pub fn geo_to_pixel_batch(&self, points: &[GeoPoint]) -> Vec<PixelPoint> {
        points.iter().map(|&g| self.geo_to_pixel(g)).collect()
    }

    /// Map an N×2 matrix of pixel points (one per row) to geo points.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, points), fields(rows = points.nrows()))
    )]
    pub fn pixel_to_geo_matrix(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>, GeoError> {
        apply_rows(&self.forward, points)
    }

    /// Map an N×2 matrix of geo points (one per row) to pixel points.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, points), fields(rows = points.nrows()))
    )]
    pub fn geo_to_pixel_matrix(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>, GeoError> {
        apply_rows(&self.inverse, points)
    }
}

fn apply_rows(h: &Homography, points: &DMatrix<f64>) -> Result<DMatrix<f64>, GeoError> {
    if points.ncols() != 2 {
        return Err(GeoError::ShapeMismatch {
            cols: points.ncols(),
        });
    }
    let mut out = DMatrix::<f64>::zeros(points.nrows(), 2);
    for r in 0..points.nrows() {
        let q = h.apply(Point2::new(points[(r, 0)], points[(r, 1)]));
        out[(r, 0)] = q.x;
        out[(r, 1)] = q.y;
    }
    Ok(out)
}
