//! Geometric descriptors of marker contours.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::geometry::{axis_angle_difference, fit_ellipse, min_area_rect, RotatedRect};

/// Centers closer than this (pixels) may describe the same marker.
pub const IDENTICAL_CENTER_TOLERANCE_PX: f32 = 2.0;
/// Axes closer than this (degrees) may describe the same marker.
pub const IDENTICAL_ANGLE_TOLERANCE_DEG: f32 = 2.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Ellipse,
}

/// Fitted shape of one contour.
///
/// `width` is the long side and `angle` its direction in `[0, 180)` degrees.
/// The vectors start at `center`: `direction` reaches the middle of the
/// short side, the diagonals reach the corners on either side of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryFeature {
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
    pub shape: Shape,
    pub direction: Vector2<f32>,
    pub clockwise_diagonal: Vector2<f32>,
    pub anticlockwise_diagonal: Vector2<f32>,
    /// Rectangle the feature was derived from.
    pub circumscribed: RotatedRect,
}

impl GeometryFeature {
    pub fn from_rotated_rect(rect: RotatedRect, shape: Shape) -> Self {
        let direction = rect.axis() * (0.5 * rect.width);
        let side = rect.normal() * (0.5 * rect.height);
        Self {
            center: rect.center,
            width: rect.width,
            height: rect.height,
            angle: rect.angle,
            shape,
            direction,
            clockwise_diagonal: direction + side,
            anticlockwise_diagonal: direction - side,
            circumscribed: rect,
        }
    }

    /// Area of the circumscribed rectangle.
    #[inline]
    pub fn area(&self) -> f32 {
        self.circumscribed.area()
    }
}

/// Minimum-area rectangle descriptor of a contour.
///
/// Degenerate contours (fewer than three non-collinear points) produce a
/// zero-area descriptor rather than an error.
pub fn rectangle_feature(contour: &[Point2<f32>]) -> GeometryFeature {
    GeometryFeature::from_rotated_rect(min_area_rect(contour), Shape::Rectangle)
}

/// Ellipse descriptor of a contour; the stored rectangle circumscribes the ellipse.
///
/// A failed fit (fewer than five points, collinear or non-elliptic data)
/// produces a zero-area descriptor at the contour centroid.
pub fn ellipse_feature(contour: &[Point2<f32>]) -> GeometryFeature {
    let rect = fit_ellipse(contour)
        .map(|fit| fit.circumscribed_rect())
        .unwrap_or_else(|| RotatedRect::degenerate(centroid(contour)));
    GeometryFeature::from_rotated_rect(rect, Shape::Ellipse)
}

fn centroid(points: &[Point2<f32>]) -> Point2<f32> {
    if points.is_empty() {
        return Point2::origin();
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f32>, p| acc + p.coords);
    Point2::from(sum / points.len() as f32)
}

/// Tolerance equality: centers and axis directions both close.
pub fn is_geometry_feature_identical(a: &GeometryFeature, b: &GeometryFeature) -> bool {
    (a.center - b.center).norm() <= IDENTICAL_CENTER_TOLERANCE_PX
        && axis_angle_difference(a.angle, b.angle) <= IDENTICAL_ANGLE_TOLERANCE_DEG
}
