//! Polygon utilities: shoelace area, convex hull, minimum-area rectangle and
//! convex intersection.

use nalgebra::{Point2, Vector2};

use super::RotatedRect;

/// Absolute area of a closed polygon (shoelace formula).
///
/// Accepts contours in either winding. Fewer than three points give zero.
pub fn polygon_area(points: &[Point2<f32>]) -> f32 {
    signed_area(points).abs() as f32
}

fn signed_area(points: &[Point2<f32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    0.5 * twice
}

#[inline]
fn cross(o: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, collinear
/// points dropped.
pub fn convex_hull(points: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut pts: Vec<Point2<f32>> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point2<f32>> = Vec::with_capacity(2 * pts.len());
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Minimum-area enclosing rectangle (rotating calipers over the hull).
///
/// Degenerate inputs never fail: a single point gives a zero-sized
/// rectangle, collinear points a zero-height one, an empty slice a
/// zero-sized rectangle at the origin.
pub fn min_area_rect(points: &[Point2<f32>]) -> RotatedRect {
    let hull = convex_hull(points);
    match hull.len() {
        0 => return RotatedRect::degenerate(Point2::origin()),
        1 => return RotatedRect::degenerate(hull[0]),
        2 => {
            let d = hull[1] - hull[0];
            let center = Point2::from((hull[0].coords + hull[1].coords) * 0.5);
            return RotatedRect::new(center, d.norm(), 0.0, d.y.atan2(d.x).to_degrees());
        }
        _ => {}
    }

    let mut best: Option<(f32, RotatedRect)> = None;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let edge = b - a;
        let len = edge.norm();
        if len <= f32::EPSILON {
            continue;
        }
        let u = edge / len;
        let v = Vector2::new(-u.y, u.x);

        let (mut u_min, mut u_max) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut v_min, mut v_max) = (f32::INFINITY, f32::NEG_INFINITY);
        for p in &hull {
            let d = *p - a;
            let pu = d.dot(&u);
            let pv = d.dot(&v);
            u_min = u_min.min(pu);
            u_max = u_max.max(pu);
            v_min = v_min.min(pv);
            v_max = v_max.max(pv);
        }

        let width = u_max - u_min;
        let height = v_max - v_min;
        let area = width * height;
        if best.as_ref().is_some_and(|(best_area, _)| *best_area <= area) {
            continue;
        }
        let center = a + u * (0.5 * (u_min + u_max)) + v * (0.5 * (v_min + v_max));
        let angle = u.y.atan2(u.x).to_degrees();
        best = Some((area, RotatedRect::new(center, width, height, angle)));
    }

    best.map(|(_, rect)| rect)
        .unwrap_or_else(|| RotatedRect::degenerate(hull[0]))
}

/// Clip a convex polygon against a counter-clockwise convex polygon
/// (Sutherland–Hodgman).
fn clip_convex(subject: &[Point2<f32>], clip: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let cur = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            let cur_in = cross(a, b, cur) >= 0.0;
            let prev_in = cross(a, b, prev) >= 0.0;
            if cur_in {
                if !prev_in {
                    output.extend(segment_line_intersection(prev, cur, a, b));
                }
                output.push(cur);
            } else if prev_in {
                output.extend(segment_line_intersection(prev, cur, a, b));
            }
        }
    }
    output
}

fn segment_line_intersection(
    p: Point2<f32>,
    q: Point2<f32>,
    a: Point2<f32>,
    b: Point2<f32>,
) -> Option<Point2<f32>> {
    let cp = cross(a, b, p);
    let cq = cross(a, b, q);
    let denom = cp - cq;
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = cp / denom;
    Some(p + (q - p) * t)
}

/// Area of the intersection of two rotated rectangles.
pub fn intersection_area(a: &RotatedRect, b: &RotatedRect) -> f32 {
    if a.is_degenerate() || b.is_degenerate() {
        return 0.0;
    }
    let clipped = clip_convex(&a.corners(), &b.corners());
    polygon_area(&clipped)
}

/// Intersection area over union area of two rotated rectangles, in `[0, 1]`.
pub fn intersection_over_union(a: &RotatedRect, b: &RotatedRect) -> f32 {
    let inter = intersection_area(a, b);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    (inter / union).clamp(0.0, 1.0)
}
