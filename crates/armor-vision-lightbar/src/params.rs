use serde::{Deserialize, Serialize};

/// Thresholds for light bar classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightBarSearchParams {
    /// Contour area over inscribed-ellipse area must exceed this.
    ///
    /// Filled rectangles reach about 0.89 to 0.95 against their fitted
    /// ellipse and filled ellipses about 0.99, so the default sits between.
    pub ellipse_fill_threshold: f32,
    /// Contour area over fitted-rectangle area must exceed this.
    pub rectangle_fill_threshold: f32,
    /// Contours with fewer points are rejected before fitting.
    pub min_contour_points: usize,
    /// Contours enclosing less area (px²) are rejected before fitting.
    pub min_contour_area: f32,
}

impl Default for LightBarSearchParams {
    fn default() -> Self {
        Self {
            ellipse_fill_threshold: 0.97,
            rectangle_fill_threshold: 0.70,
            min_contour_points: 3,
            min_contour_area: 4.0,
        }
    }
}
