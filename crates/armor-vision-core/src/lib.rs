//! Core types and utilities for light bar and armor plate detection.
//!
//! This crate is purely geometric. It does *not* depend on any image type or
//! contour extractor: contours come in as point slices and everything else is
//! built from rotated rectangles.

mod feature;
mod geometry;
mod logger;
mod region;

pub use feature::{
    ellipse_feature, is_geometry_feature_identical, rectangle_feature, GeometryFeature, Shape,
    IDENTICAL_ANGLE_TOLERANCE_DEG, IDENTICAL_CENTER_TOLERANCE_PX,
};
pub use geometry::{
    axis_angle_difference, convex_hull, fit_ellipse, intersection_area, intersection_over_union,
    min_area_rect, normalize_axis_angle, polygon_area, EllipseFit, RotatedRect,
};
pub use region::{PixelOffset, PixelRect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{fallback_directive, init_with_level, parse_level_filter};
