//! Direct least-squares ellipse fit (Fitzgibbon, Pilu & Fisher) in the
//! numerically stable block form of Halir & Flusser.

use arena_vision_core::{EllipseBox, Point2};
use nalgebra::{Matrix2, Matrix3, Matrix6, Vector2, Vector3};

use crate::GeometryError;

const MIN_POINTS: usize = 6;

pub(crate) fn fit_ellipse(points: &[Point2<i32>]) -> Result<EllipseBox, GeometryError> {
    if points.len() < MIN_POINTS {
        return Err(GeometryError::TooFewPoints {
            needed: MIN_POINTS,
            got: points.len(),
        });
    }

    let (mx, my, scale) = normalization(points);

    // Scatter matrix of the design rows [x², xy, y², x, y, 1].
    let mut s = Matrix6::<f64>::zeros();
    for p in points {
        let x = (p.x as f64 - mx) * scale;
        let y = (p.y as f64 - my) * scale;
        let row = [x * x, x * y, y * y, x, y, 1.0];
        for i in 0..6 {
            for j in 0..6 {
                s[(i, j)] += row[i] * row[j];
            }
        }
    }

    let s1 = s.fixed_view::<3, 3>(0, 0).into_owned();
    let s2 = s.fixed_view::<3, 3>(0, 3).into_owned();
    let s3 = s.fixed_view::<3, 3>(3, 3).into_owned();

    // S3 is the scatter of [x, y, 1]; it is rank deficient for collinear input.
    let n3 = (points.len() as f64).powi(3);
    if s3.determinant().abs() < 1e-9 * n3 {
        return Err(GeometryError::Degenerate("collinear or repeated points"));
    }
    let s3_inv = s3
        .try_inverse()
        .ok_or(GeometryError::Degenerate("collinear or repeated points"))?;
    let t = -s3_inv * s2.transpose();
    let m = s1 + s2 * t;

    // Premultiply by the inverse of the constraint matrix [[0,0,2],[0,-1,0],[2,0,0]].
    let c_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let system = c_inv * m;

    let a1 = constrained_eigenvector(&system)
        .ok_or(GeometryError::Degenerate("no elliptic solution"))?;
    let a2 = t * a1;

    let conic = denormalize([a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]], mx, my, scale);
    conic_to_box(conic)
}

fn normalization(points: &[Point2<i32>]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let my = points.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| (p.x as f64 - mx).hypot(p.y as f64 - my))
        .sum::<f64>()
        / n;
    let scale = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    (mx, my, scale)
}

/// Eigenvector of `system` whose conic satisfies `4ac - b² > 0`.
fn constrained_eigenvector(system: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let eigenvalues = system.complex_eigenvalues();
    let mut best: Option<(f64, Vector3<f64>)> = None;
    for ev in eigenvalues.iter() {
        if !ev.re.is_finite() || ev.im.abs() > 1e-9 * (1.0 + ev.re.abs()) {
            continue;
        }
        let Some(v) = null_vector(&(system - Matrix3::identity() * ev.re)) else {
            continue;
        };
        let constraint = 4.0 * v[0] * v[2] - v[1] * v[1];
        if constraint <= 0.0 {
            continue;
        }
        if best.as_ref().is_none_or(|(b, _)| ev.re.abs() < *b) {
            best = Some((ev.re.abs(), v));
        }
    }
    best.map(|(_, v)| v)
}

/// Null vector of a rank-2 matrix: the largest row of its adjugate.
fn null_vector(m: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let rows = [
        m.row(1).transpose().cross(&m.row(2).transpose()),
        m.row(2).transpose().cross(&m.row(0).transpose()),
        m.row(0).transpose().cross(&m.row(1).transpose()),
    ];
    let best = rows
        .iter()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let norm = best.norm();
    if norm < 1e-15 {
        return None;
    }
    Some(best / norm)
}

/// Map conic coefficients from normalized coordinates `x' = s(x - mx)` back
/// to pixel coordinates.
fn denormalize(c: [f64; 6], mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a, b, cc, d, e, f] = c;
    let s2 = s * s;
    [
        a * s2,
        b * s2,
        cc * s2,
        -2.0 * a * s2 * mx - b * s2 * my + d * s,
        -b * s2 * mx - 2.0 * cc * s2 * my + e * s,
        a * s2 * mx * mx + b * s2 * mx * my + cc * s2 * my * my - d * s * mx - e * s * my + f,
    ]
}

fn conic_to_box(conic: [f64; 6]) -> Result<EllipseBox, GeometryError> {
    let [mut a, mut b, mut c, mut d, mut e, mut f] = conic;
    if a + c < 0.0 {
        a = -a;
        b = -b;
        c = -c;
        d = -d;
        e = -e;
        f = -f;
    }
    if 4.0 * a * c - b * b <= 0.0 {
        return Err(GeometryError::Degenerate("conic is not an ellipse"));
    }

    let center = Matrix2::new(2.0 * a, b, b, 2.0 * c)
        .try_inverse()
        .map(|inv| inv * Vector2::new(-d, -e))
        .ok_or(GeometryError::Degenerate("singular conic center"))?;
    let (x0, y0) = (center[0], center[1]);
    let f0 = a * x0 * x0 + b * x0 * y0 + c * y0 * y0 + d * x0 + e * y0 + f;
    if f0 >= 0.0 {
        return Err(GeometryError::Degenerate("imaginary ellipse"));
    }

    // Eigenvalues of the quadratic form [[a, b/2], [b/2, c]]; theta points
    // along the eigenvector of the larger one, i.e. the shorter axis.
    let mean = 0.5 * (a + c);
    let spread = 0.5 * ((a - c).powi(2) + b * b).sqrt();
    let lambda_max = mean + spread;
    let lambda_min = mean - spread;
    if lambda_min <= 0.0 {
        return Err(GeometryError::Degenerate("conic is not an ellipse"));
    }
    let theta = 0.5 * b.atan2(a - c);
    let width = 2.0 * (-f0 / lambda_max).sqrt();
    let height = 2.0 * (-f0 / lambda_min).sqrt();

    let out = EllipseBox {
        center: Point2::new(x0 as f32, y0 as f32),
        width: width as f32,
        height: height as f32,
        angle: theta.to_degrees() as f32,
    };
    let finite = out.center.x.is_finite()
        && out.center.y.is_finite()
        && out.width.is_finite()
        && out.height.is_finite()
        && out.angle.is_finite();
    if !finite || out.width <= 0.0 || out.height <= 0.0 {
        return Err(GeometryError::Degenerate("non-finite ellipse"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ellipse_points(cx: f64, cy: f64, a: f64, b: f64, angle: f64, n: usize) -> Vec<Point2<i32>> {
        let (s, c) = angle.sin_cos();
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                let (x, y) = (a * t.cos(), b * t.sin());
                Point2::new(
                    (cx + c * x - s * y).round() as i32,
                    (cy + s * x + c * y).round() as i32,
                )
            })
            .collect()
    }

    #[test]
    fn circle_fit_recovers_center_and_size() {
        let pts = ellipse_points(200.0, 150.0, 40.0, 40.0, 0.0, 160);
        let e = fit_ellipse(&pts).expect("fit");
        assert_abs_diff_eq!(e.center.x, 200.0, epsilon = 0.5);
        assert_abs_diff_eq!(e.center.y, 150.0, epsilon = 0.5);
        assert_abs_diff_eq!(e.width, 80.0, epsilon = 1.5);
        assert_abs_diff_eq!(e.height, 80.0, epsilon = 1.5);
        assert!(e.eccentricity() < 0.02);
    }

    #[test]
    fn rotated_ellipse_axes_and_angle() {
        let pts = ellipse_points(100.0, 80.0, 60.0, 20.0, 30f64.to_radians(), 200);
        let e = fit_ellipse(&pts).expect("fit");
        assert_abs_diff_eq!(e.center.x, 100.0, epsilon = 0.5);
        assert_abs_diff_eq!(e.center.y, 80.0, epsilon = 0.5);
        // The width axis is the short one and sits perpendicular to the major axis.
        assert_abs_diff_eq!(e.width, 40.0, epsilon = 1.5);
        assert_abs_diff_eq!(e.height, 120.0, epsilon = 1.5);
        let major_dir = (e.angle + 90.0).rem_euclid(180.0);
        assert_abs_diff_eq!(major_dir, 30.0, epsilon = 1.0);
        assert_abs_diff_eq!(e.eccentricity(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let pts: Vec<_> = (0..5).map(|i| Point2::new(i, i * i)).collect();
        assert_eq!(
            fit_ellipse(&pts),
            Err(GeometryError::TooFewPoints { needed: 6, got: 5 })
        );
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts: Vec<_> = (0..30).map(|i| Point2::new(i, 2 * i + 1)).collect();
        assert!(matches!(fit_ellipse(&pts), Err(GeometryError::Degenerate(_))));

        let repeated = vec![Point2::new(4, 4); 12];
        assert!(fit_ellipse(&repeated).is_err());
    }
}
