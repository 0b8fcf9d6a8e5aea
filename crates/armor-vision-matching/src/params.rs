use serde::{Deserialize, Serialize};

/// Geometric acceptance rules for a marker pair.
///
/// Lengths are the long sides of the markers' rectangles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorMatchParams {
    /// Shorter length over longer length.
    pub min_length_ratio: f32,
    /// Largest axis direction difference, degrees.
    pub max_angle_diff_deg: f32,
    /// Center distance over mean length, lower bound.
    pub min_separation_ratio: f32,
    /// Center distance over mean length, upper bound.
    pub max_separation_ratio: f32,
    /// Center offset along the mean marker axis over mean length.
    pub max_axial_offset_ratio: f32,
    /// Whether a rectangle marker may pair with an ellipse marker.
    pub allow_mixed_shapes: bool,
}

impl Default for ArmorMatchParams {
    fn default() -> Self {
        Self {
            min_length_ratio: 0.5,
            max_angle_diff_deg: 15.0,
            min_separation_ratio: 0.8,
            max_separation_ratio: 5.0,
            max_axial_offset_ratio: 0.6,
            allow_mixed_shapes: true,
        }
    }
}
