//! Progressive probabilistic Hough transform (Matas, Galambos & Kittler).
//!
//! Member pixels are visited in a seeded random order. Each one votes into a
//! (theta, rho) accumulator; once a cell reaches the threshold, the line
//! corridor through the pixel is walked in both directions, and the pixels on
//! it are withdrawn so they never vote again.

use arena_vision_core::{LineSegment, Mask, Point2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::HoughLineParams;

const SHIFT: i32 = 16;

#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(raster, params), fields(width = raster.width, height = raster.height))
)]
pub(crate) fn hough_lines(raster: &Mask, params: &HoughLineParams) -> Vec<LineSegment> {
    let (w, h) = (raster.width as i32, raster.height as i32);
    if w == 0 || h == 0 || params.rho <= 0.0 || params.theta <= 0.0 {
        return Vec::new();
    }

    let num_angle = ((std::f32::consts::PI / params.theta).round() as usize).max(1);
    let num_rho = ((((w + h) * 2 + 1) as f32 / params.rho).round() as usize).max(1);
    let rho_offset = (num_rho as i32 - 1) / 2;
    let irho = 1.0 / params.rho;
    let trig: Vec<(f32, f32)> = (0..num_angle)
        .map(|n| {
            let a = n as f32 * params.theta;
            (a.cos() * irho, a.sin() * irho)
        })
        .collect();

    let threshold = params.threshold as i32;
    let line_gap = params.max_line_gap as i32;
    let line_length = params.min_line_length as i32;

    let mut accum = vec![0i32; num_angle * num_rho];
    let mut live: Vec<bool> = raster.data.iter().map(|&v| v != Mask::NON_MEMBER).collect();
    let mut points: Vec<(i32, i32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if live[(y * w + x) as usize] {
                points.push((x, y));
            }
        }
    }
    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let rho_index = |x: i32, y: i32, n: usize| -> Option<usize> {
        let (c, s) = trig[n];
        let r = (x as f32 * c + y as f32 * s).round() as i32 + rho_offset;
        (r >= 0 && (r as usize) < num_rho).then_some(n * num_rho + r as usize)
    };

    let mut lines = Vec::new();
    for &(px, py) in &points {
        if !live[(py * w + px) as usize] {
            continue;
        }

        let mut max_val = threshold - 1;
        let mut max_n = 0usize;
        for n in 0..num_angle {
            if let Some(i) = rho_index(px, py, n) {
                accum[i] += 1;
                if accum[i] > max_val {
                    max_val = accum[i];
                    max_n = n;
                }
            }
        }
        if max_val < threshold {
            continue;
        }

        // Walk direction is perpendicular to the (cos, sin) normal. The major
        // axis advances by one pixel per step, the minor one in fixed point.
        let (c, s) = trig[max_n];
        let a = -s;
        let b = c;
        let x_major = a.abs() > b.abs();
        let (x0, y0, dx0, dy0) = if x_major {
            let dx0 = if a > 0.0 { 1 } else { -1 };
            let dy0 = (b * (1 << SHIFT) as f32 / a.abs()).round() as i32;
            (px, (py << SHIFT) + (1 << (SHIFT - 1)), dx0, dy0)
        } else {
            let dy0 = if b > 0.0 { 1 } else { -1 };
            let dx0 = (a * (1 << SHIFT) as f32 / b.abs()).round() as i32;
            ((px << SHIFT) + (1 << (SHIFT - 1)), py, dx0, dy0)
        };
        let to_pixel = |x: i32, y: i32| -> (i32, i32) {
            if x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            }
        };

        let mut line_end = [(px, py); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            let mut gap = 0;
            loop {
                let (j, i) = to_pixel(x, y);
                if j < 0 || j >= w || i < 0 || i >= h {
                    break;
                }
                if live[(i * w + j) as usize] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > line_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= line_length
            || (line_end[1].1 - line_end[0].1).abs() >= line_length;

        for (k, end) in line_end.iter().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            loop {
                let (j, i) = to_pixel(x, y);
                if j < 0 || j >= w || i < 0 || i >= h {
                    break;
                }
                let idx = (i * w + j) as usize;
                if live[idx] {
                    if good_line {
                        for n in 0..num_angle {
                            if let Some(ai) = rho_index(j, i, n) {
                                accum[ai] -= 1;
                            }
                        }
                    }
                    live[idx] = false;
                }
                if (j, i) == *end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            lines.push(LineSegment::new(
                Point2::new(line_end[0].0, line_end[0].1),
                Point2::new(line_end[1].0, line_end[1].1),
            ));
        }
    }

    log::trace!("hough lines: {} points, {} segments", points.len(), lines.len());
    lines
}
