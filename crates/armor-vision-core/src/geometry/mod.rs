//! Planar geometry used by the light bar classifier and the armor tracker.

mod ellipse;
mod polygon;
mod rotated_rect;

pub use ellipse::{fit_ellipse, EllipseFit};
pub use polygon::{
    convex_hull, intersection_area, intersection_over_union, min_area_rect, polygon_area,
};
pub use rotated_rect::{axis_angle_difference, normalize_axis_angle, RotatedRect};
