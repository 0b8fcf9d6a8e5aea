//! Direct least-squares ellipse fit (Fitzgibbon, Pilu & Fisher, 1999).

use nalgebra::{Matrix3, Matrix6, Point2, Vector3, Vector6};

use super::RotatedRect;

/// Geometric ellipse in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseFit {
    pub center: Point2<f64>,
    /// Semi-axis along `angle`.
    pub semi_axis_u: f64,
    /// Semi-axis perpendicular to `angle`.
    pub semi_axis_v: f64,
    /// Direction of the `u` axis from +x, radians.
    pub angle: f64,
}

impl EllipseFit {
    /// Rectangle circumscribing the ellipse (sides are the full axes).
    pub fn circumscribed_rect(&self) -> RotatedRect {
        RotatedRect::new(
            Point2::new(self.center.x as f32, self.center.y as f32),
            (2.0 * self.semi_axis_u) as f32,
            (2.0 * self.semi_axis_v) as f32,
            self.angle.to_degrees() as f32,
        )
    }
}

/// Fit an ellipse to contour points.
///
/// Needs at least 5 points. Returns `None` when the scatter matrix is
/// singular (e.g. collinear points) or the best conic is not a real ellipse.
pub fn fit_ellipse(points: &[Point2<f32>]) -> Option<EllipseFit> {
    if points.len() < 5 {
        return None;
    }

    // Move to the centroid and scale to mean radius sqrt(2).
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    let (mx, my) = (sx / n, sy / n);
    let mean_dist = points
        .iter()
        .map(|p| ((p.x as f64 - mx).powi(2) + (p.y as f64 - my).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    if mean_dist <= 1e-12 {
        return None;
    }
    let scale = std::f64::consts::SQRT_2 / mean_dist;

    let mut scatter = Matrix6::<f64>::zeros();
    for p in points {
        let x = (p.x as f64 - mx) * scale;
        let y = (p.y as f64 - my) * scale;
        let row = Vector6::new(x * x, x * y, y * y, x, y, 1.0);
        scatter += row * row.transpose();
    }

    let s11: Matrix3<f64> = scatter.fixed_view::<3, 3>(0, 0).into_owned();
    let s12: Matrix3<f64> = scatter.fixed_view::<3, 3>(0, 3).into_owned();
    let s22: Matrix3<f64> = scatter.fixed_view::<3, 3>(3, 3).into_owned();
    if s22.determinant().abs() <= 1e-9 * n.powi(3) {
        return None;
    }
    let s22_inv = s22.try_inverse()?;

    // Reduced system M a1 = λ C1 a1 with C1 encoding 4AC - B^2 = 1.
    let m = s11 - s12 * s22_inv * s12.transpose();
    let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let system = c1_inv * m;

    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in system.complex_eigenvalues().iter() {
        if ev.im.abs() > 1e-9 * (1.0 + ev.re.abs()) {
            continue;
        }
        let Some(v) = null_vector(&(system - Matrix3::identity() * ev.re)) else {
            continue;
        };
        if 4.0 * v[0] * v[2] - v[1] * v[1] <= 0.0 {
            continue;
        }
        if best.as_ref().map_or(true, |(b, _)| ev.re.abs() < *b) {
            best = Some((ev.re.abs(), v));
        }
    }
    let (_, a1) = best?;
    let a2 = -s22_inv * s12.transpose() * a1;

    let local = conic_to_ellipse([a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]])?;
    Some(EllipseFit {
        center: Point2::new(local.center.x / scale + mx, local.center.y / scale + my),
        semi_axis_u: local.semi_axis_u / scale,
        semi_axis_v: local.semi_axis_v / scale,
        angle: local.angle,
    })
}

/// Null vector of a rank-2 3x3 matrix: the longest cross product of two rows.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows = [
        m.row(0).transpose(),
        m.row(1).transpose(),
        m.row(2).transpose(),
    ];
    let v = [
        rows[0].cross(&rows[1]),
        rows[0].cross(&rows[2]),
        rows[1].cross(&rows[2]),
    ]
    .into_iter()
    .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let norm = v.norm();
    (norm > 1e-15).then(|| v / norm)
}

/// Convert `A x² + B xy + C y² + D x + E y + F = 0` to geometric form.
fn conic_to_ellipse([a, b, c, d, e, f]: [f64; 6]) -> Option<EllipseFit> {
    let denom = 4.0 * a * c - b * b;
    if denom <= 0.0 {
        return None;
    }
    let cx = (b * e - 2.0 * c * d) / denom;
    let cy = (b * d - 2.0 * a * e) / denom;
    let f0 = a * cx * cx + b * cx * cy + c * cy * cy + d * cx + e * cy + f;

    let mean = 0.5 * (a + c);
    let half_spread = 0.5 * ((a - c).powi(2) + b * b).sqrt();
    let lambda_u = mean + half_spread;
    let lambda_v = mean - half_spread;
    let su = -f0 / lambda_u;
    let sv = -f0 / lambda_v;
    if !(su > 0.0 && sv > 0.0 && su.is_finite() && sv.is_finite()) {
        return None;
    }

    Some(EllipseFit {
        center: Point2::new(cx, cy),
        semi_axis_u: su.sqrt(),
        semi_axis_v: sv.sqrt(),
        angle: 0.5 * b.atan2(a - c),
    })
}
