use armor_vision_core::{axis_angle_difference, min_area_rect, GeometryFeature, RotatedRect};
use armor_vision_lightbar::{LightBarSearchResult, MarkerCandidate};
use nalgebra::Vector2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ArmorMatchParams, ElementPair, ElementPairSet};

/// Tests every unordered marker pair against [`ArmorMatchParams`].
#[derive(Clone, Debug, Default)]
pub struct ArmorMatcher {
    params: ArmorMatchParams,
}

impl ArmorMatcher {
    pub fn new(params: ArmorMatchParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ArmorMatchParams {
        &self.params
    }

    /// Pair the markers of one light bar search, rectangles and ellipses alike.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(markers = markers.len()))
    )]
    pub fn match_markers(&self, markers: &LightBarSearchResult) -> ElementPairSet {
        let all: Vec<MarkerCandidate> = markers.iter().copied().collect();
        self.match_candidates(&all)
    }

    /// Pair arbitrary markers; each unordered pair is tested once.
    pub fn match_candidates(&self, markers: &[MarkerCandidate]) -> ElementPairSet {
        let mut set = ElementPairSet::new();
        let mut accepted = 0usize;
        for (i, a) in markers.iter().enumerate() {
            for b in &markers[i + 1..] {
                if self.accepts(&a.feature, &b.feature) {
                    accepted += 1;
                    set.insert(ElementPair::new(a.feature, b.feature));
                }
            }
        }
        log::debug!(
            "armor matching: {} markers, {} accepted pairs, {} unique",
            markers.len(),
            accepted,
            set.len()
        );
        set
    }

    /// Whether two markers look like the two light bars of one plate.
    pub fn accepts(&self, a: &GeometryFeature, b: &GeometryFeature) -> bool {
        let p = &self.params;
        if !p.allow_mixed_shapes && a.shape != b.shape {
            return false;
        }

        let (short, long) = if a.width <= b.width {
            (a.width, b.width)
        } else {
            (b.width, a.width)
        };
        if long.is_nan() || long <= 0.0 || short / long < p.min_length_ratio {
            return false;
        }

        if axis_angle_difference(a.angle, b.angle) > p.max_angle_diff_deg {
            return false;
        }

        let mean_length = 0.5 * (a.width + b.width);
        let offset = b.center - a.center;
        let separation = offset.norm() / mean_length;
        if separation < p.min_separation_ratio || separation > p.max_separation_ratio {
            return false;
        }

        let axial = offset.dot(&mean_axis(a, b)).abs() / mean_length;
        axial <= p.max_axial_offset_ratio
    }
}

/// Unit vector bisecting both marker axes.
fn mean_axis(a: &GeometryFeature, b: &GeometryFeature) -> Vector2<f32> {
    let u = a.circumscribed.axis();
    let mut v = b.circumscribed.axis();
    if u.dot(&v) < 0.0 {
        v = -v;
    }
    let sum = u + v;
    let norm = sum.norm();
    if norm > f32::EPSILON {
        sum / norm
    } else {
        u
    }
}

/// Minimum-area rectangle covering both markers of a pair.
pub fn cast_pair_to_rotated_rect(pair: &ElementPair) -> RotatedRect {
    let mut corners = Vec::with_capacity(8);
    corners.extend_from_slice(&pair.first.circumscribed.corners());
    corners.extend_from_slice(&pair.second.circumscribed.corners());
    min_area_rect(&corners)
}
