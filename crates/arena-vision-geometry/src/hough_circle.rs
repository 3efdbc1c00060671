//! Gradient Hough circle transform.
//!
//! Edge pixels vote along both directions of their gradient into a
//! downscaled center accumulator; strong local maxima become center
//! candidates, and each center gets the radius with the densest edge support.

use arena_vision_core::{Circle, Mask, Point2};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::raster::mask_to_gray;
use crate::HoughCircleParams;

const GRADIENT_SIGMA: f32 = 1.0;

#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(raster, params), fields(width = raster.width, height = raster.height))
)]
pub(crate) fn hough_circles(raster: &Mask, params: &HoughCircleParams) -> Vec<Circle> {
    let (w, h) = (raster.width, raster.height);
    if w < 3 || h < 3 || raster.is_empty() {
        return Vec::new();
    }
    let dp = params.resolution.max(1.0);
    let min_r = params.min_radius as f32;
    let max_r = if params.max_radius == 0 {
        w.max(h) as f32
    } else {
        params.max_radius as f32
    };
    if max_r < min_r {
        return Vec::new();
    }

    let gray = mask_to_gray(raster);
    let high = params.accumulator_threshold.max(1.0);
    let edges = canny(&gray, 0.5 * high, high);
    let smoothed = gaussian_blur_f32(&gray, GRADIENT_SIGMA);
    let gx = horizontal_sobel(&smoothed);
    let gy = vertical_sobel(&smoothed);

    let acc_w = (w as f32 / dp).ceil() as usize + 1;
    let acc_h = (h as f32 / dp).ceil() as usize + 1;
    let mut accum = vec![0u32; acc_w * acc_h];
    let mut edge_points = Vec::new();

    for (x, y, px) in edges.enumerate_pixels() {
        if px.0[0] == 0 {
            continue;
        }
        edge_points.push((x as f32, y as f32));
        let vx = gx.get_pixel(x, y).0[0] as f32;
        let vy = gy.get_pixel(x, y).0[0] as f32;
        let mag = vx.hypot(vy);
        if mag < 1e-3 {
            continue;
        }
        let (ux, uy) = (vx / mag, vy / mag);
        for sign in [1.0f32, -1.0] {
            cast_votes(
                &mut accum,
                (acc_w, acc_h),
                dp,
                (x as f32, y as f32),
                (sign * ux, sign * uy),
                (min_r, max_r),
            );
        }
    }
    if edge_points.is_empty() {
        return Vec::new();
    }

    let threshold = params.center_threshold;
    let mut centers = Vec::new();
    for ay in 1..acc_h - 1 {
        for ax in 1..acc_w - 1 {
            let i = ay * acc_w + ax;
            let v = accum[i];
            if v > threshold
                && v > accum[i - 1]
                && v >= accum[i + 1]
                && v > accum[i - acc_w]
                && v >= accum[i + acc_w]
            {
                centers.push((v, ax, ay));
            }
        }
    }
    // Strongest first; position breaks ties so results are reproducible.
    centers.sort_by(|a, b| b.0.cmp(&a.0).then(a.2.cmp(&b.2)).then(a.1.cmp(&b.1)));

    let min_dist_sq = params.min_dist * params.min_dist;
    let mut out: Vec<Circle> = Vec::new();
    for &(_, ax, ay) in &centers {
        let center = refine_center(&accum, acc_w, ax, ay, dp);
        if out
            .iter()
            .any(|c| (c.center - center).norm_squared() < min_dist_sq)
        {
            continue;
        }
        if let Some(radius) = best_radius(&edge_points, center, dp, (min_r, max_r), threshold) {
            out.push(Circle { center, radius });
        }
    }
    log::trace!(
        "hough circles: {} edge px, {} centers, {} circles",
        edge_points.len(),
        centers.len(),
        out.len()
    );
    out
}

/// Walk one gradient ray in 1 px steps, voting once per accumulator cell.
fn cast_votes(
    accum: &mut [u32],
    (acc_w, acc_h): (usize, usize),
    dp: f32,
    (x, y): (f32, f32),
    (ux, uy): (f32, f32),
    (min_r, max_r): (f32, f32),
) {
    let mut last = usize::MAX;
    let mut r = min_r.max(1.0);
    while r <= max_r {
        let ax = ((x + ux * r) / dp).round();
        let ay = ((y + uy * r) / dp).round();
        if ax < 0.0 || ay < 0.0 || ax as usize >= acc_w || ay as usize >= acc_h {
            break;
        }
        let i = ay as usize * acc_w + ax as usize;
        if i != last {
            accum[i] += 1;
            last = i;
        }
        r += 1.0;
    }
}

/// Vote-weighted centroid of the 3x3 cell neighborhood, in pixels.
fn refine_center(accum: &[u32], acc_w: usize, ax: usize, ay: usize, dp: f32) -> Point2<f32> {
    let mut sum = 0.0f32;
    let mut sx = 0.0f32;
    let mut sy = 0.0f32;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let cx = (ax as i32 + dx) as usize;
            let cy = (ay as i32 + dy) as usize;
            let v = accum[cy * acc_w + cx] as f32;
            sum += v;
            sx += v * cx as f32;
            sy += v * cy as f32;
        }
    }
    Point2::new(sx / sum * dp, sy / sum * dp)
}

/// Radius bin (width `dp`) with the most edge support per unit radius, if
/// that support exceeds `threshold`. Returns the mean distance in the bin.
fn best_radius(
    edge_points: &[(f32, f32)],
    center: Point2<f32>,
    dp: f32,
    (min_r, max_r): (f32, f32),
    threshold: u32,
) -> Option<f32> {
    let bins = ((max_r - min_r) / dp).floor() as usize + 1;
    let mut counts = vec![0u32; bins];
    let mut sums = vec![0.0f32; bins];
    for &(x, y) in edge_points {
        let d = (x - center.x).hypot(y - center.y);
        if d < min_r.max(1.0) || d > max_r {
            continue;
        }
        let b = ((d - min_r) / dp) as usize;
        if b < bins {
            counts[b] += 1;
            sums[b] += d;
        }
    }

    let mut best: Option<(f32, usize)> = None;
    for (b, &n) in counts.iter().enumerate() {
        if n <= threshold {
            continue;
        }
        let r = sums[b] / n as f32;
        let score = n as f32 / r;
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, b));
        }
    }
    best.map(|(_, b)| sums[b] / counts[b] as f32)
}
