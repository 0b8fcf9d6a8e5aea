use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Rotated rectangle in image pixel coordinates.
///
/// Always kept in canonical form: `width >= height` and `angle` is the
/// direction of the long side in degrees, in `[0, 180)`. Two rectangles that
/// describe the same region therefore compare field by field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl RotatedRect {
    /// Build a rectangle from side lengths along `angle` and its normal.
    ///
    /// Negative sizes are clamped to zero. If `height > width` the sides are
    /// swapped and the angle turned by 90 degrees.
    pub fn new(center: Point2<f32>, width: f32, height: f32, angle: f32) -> Self {
        let (w, h) = (width.max(0.0), height.max(0.0));
        let (width, height, angle) = if h > w {
            (h, w, angle + 90.0)
        } else {
            (w, h, angle)
        };
        Self {
            center,
            width,
            height,
            angle: normalize_axis_angle(angle),
        }
    }

    /// Zero-sized rectangle at `center`.
    pub fn degenerate(center: Point2<f32>) -> Self {
        Self::new(center, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let area = self.area();
        area.is_nan() || area <= 0.0
    }

    /// Unit vector along the long side.
    pub fn axis(&self) -> Vector2<f32> {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        Vector2::new(cos, sin)
    }

    /// Unit vector along the short side.
    pub fn normal(&self) -> Vector2<f32> {
        let u = self.axis();
        Vector2::new(-u.y, u.x)
    }

    /// Corner points, counter-clockwise in a right-handed frame.
    pub fn corners(&self) -> [Point2<f32>; 4] {
        let u = self.axis() * (0.5 * self.width);
        let v = self.normal() * (0.5 * self.height);
        let c = self.center;
        [c - u - v, c + u - v, c + u + v, c - u + v]
    }

    /// Axis-aligned bounds as `(min, max)` corners.
    pub fn bounds(&self) -> (Point2<f32>, Point2<f32>) {
        let corners = self.corners();
        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Same rectangle shifted by `(dx, dy)` pixels.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            center: Point2::new(self.center.x + dx, self.center.y + dy),
            ..*self
        }
    }
}

/// Wrap an angle in degrees into `[0, 180)`.
pub fn normalize_axis_angle(degrees: f32) -> f32 {
    let a = degrees.rem_euclid(180.0);
    if a >= 180.0 {
        a - 180.0
    } else {
        a
    }
}

/// Unsigned difference between two axis directions, in `[0, 90]` degrees.
pub fn axis_angle_difference(a: f32, b: f32) -> f32 {
    let d = normalize_axis_angle(a - b);
    d.min(180.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tall_rectangles_are_turned_to_canonical_form() {
        let r = RotatedRect::new(Point2::new(10.0, 10.0), 4.0, 20.0, 0.0);
        assert_eq!(r.width, 20.0);
        assert_eq!(r.height, 4.0);
        assert_abs_diff_eq!(r.angle, 90.0);
    }

    #[test]
    fn angles_wrap_into_half_turn() {
        assert_abs_diff_eq!(normalize_axis_angle(-30.0), 150.0);
        assert_abs_diff_eq!(normalize_axis_angle(370.0), 10.0);
        assert_abs_diff_eq!(axis_angle_difference(5.0, 175.0), 10.0);
        assert_abs_diff_eq!(axis_angle_difference(0.0, 90.0), 90.0);
    }

    #[test]
    fn corners_and_bounds_of_axis_aligned_rect() {
        let r = RotatedRect::new(Point2::new(50.0, 50.0), 10.0, 4.0, 0.0);
        let c = r.corners();
        assert_eq!(c[0], Point2::new(45.0, 48.0));
        assert_eq!(c[2], Point2::new(55.0, 52.0));
        let (min, max) = r.bounds();
        assert_eq!(min, Point2::new(45.0, 48.0));
        assert_eq!(max, Point2::new(55.0, 52.0));
        assert_eq!(r.area(), 40.0);
    }

    #[test]
    fn zero_sized_rect_is_degenerate() {
        assert!(RotatedRect::degenerate(Point2::origin()).is_degenerate());
        assert!(RotatedRect::new(Point2::origin(), 3.0, 0.0, 12.0).is_degenerate());
    }
}
