use armor_vision_core::{ellipse_feature, polygon_area, rectangle_feature, GeometryFeature, Shape};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::LightBarSearchParams;

/// Area of an ellipse over the area of its circumscribed rectangle.
pub const INSCRIBED_ELLIPSE_AREA_RATIO: f32 = std::f32::consts::FRAC_PI_4;

/// A contour accepted as a light bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerCandidate {
    pub feature: GeometryFeature,
    /// Fill ratio that passed the threshold.
    pub confidence: f32,
}

impl MarkerCandidate {
    #[inline]
    pub fn shape(&self) -> Shape {
        self.feature.shape
    }
}

/// Classify one contour.
///
/// The ellipse test runs first (contours with at least five points) and
/// wins when it passes; the rectangle test is the fallback. Both compare
/// with a strict `>`.
pub fn classify_contour(
    contour: &[Point2<f32>],
    params: &LightBarSearchParams,
) -> Option<MarkerCandidate> {
    if contour.len() < params.min_contour_points.max(1) {
        return None;
    }
    let contour_area = polygon_area(contour);
    if contour_area < params.min_contour_area {
        return None;
    }

    if contour.len() >= 5 {
        let feature = ellipse_feature(contour);
        let ellipse_area = feature.area() * INSCRIBED_ELLIPSE_AREA_RATIO;
        if ellipse_area > 0.0 {
            let confidence = contour_area / ellipse_area;
            if confidence > params.ellipse_fill_threshold {
                return Some(MarkerCandidate {
                    feature,
                    confidence,
                });
            }
        }
    }

    let feature = rectangle_feature(contour);
    let rectangle_area = feature.area();
    if rectangle_area > 0.0 {
        let confidence = contour_area / rectangle_area;
        if confidence > params.rectangle_fill_threshold {
            return Some(MarkerCandidate {
                feature,
                confidence,
            });
        }
    }

    None
}
