use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Closed boundary of a connected region in a [`Mask`](crate::Mask).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Rotated bounding box of a fitted ellipse.
///
/// `width` and `height` are full axis lengths in pixels; `angle` is the
/// rotation of the `width` axis from +x, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EllipseBox {
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl EllipseBox {
    /// Roundness of the box, see [`eccentricity`].
    #[inline]
    pub fn eccentricity(&self) -> f32 {
        eccentricity(self.width, self.height)
    }
}

/// `|h - w| / (h + w)`: 0 for a square box, approaching 1 when elongated.
///
/// A non-positive or non-finite `w + h` yields `1.0`, so degenerate boxes
/// never pass a roundness test.
#[inline]
pub fn eccentricity(width: f32, height: f32) -> f32 {
    let sum = height + width;
    if !sum.is_finite() || sum <= 0.0 {
        return 1.0;
    }
    ((height - width) / sum).abs()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

/// Line segment with integer pixel endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point2<i32>,
    pub end: Point2<i32>,
}

impl LineSegment {
    pub fn new(start: Point2<i32>, end: Point2<i32>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        let dx = (self.end.x - self.start.x) as f32;
        let dy = (self.end.y - self.start.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self) -> Point2<f32> {
        Point2::new(
            0.5 * (self.start.x + self.end.x) as f32,
            0.5 * (self.start.y + self.end.y) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eccentricity_is_symmetric() {
        for &(w, h) in &[(10.0, 12.0), (1.0, 100.0), (37.5, 36.0), (5.0, 0.5)] {
            assert_eq!(eccentricity(w, h), eccentricity(h, w));
        }
    }

    #[test]
    fn eccentricity_of_square_box_is_zero() {
        for &s in &[0.5f32, 1.0, 80.0, 639.0] {
            assert_eq!(eccentricity(s, s), 0.0);
        }
    }

    #[test]
    fn eccentricity_range() {
        assert_relative_eq!(eccentricity(10.0, 30.0), 0.5);
        assert!(eccentricity(1.0, 1e6) < 1.0);
        assert_eq!(eccentricity(0.0, 0.0), 1.0);
        assert_eq!(eccentricity(f32::NAN, 3.0), 1.0);
    }

    #[test]
    fn segment_length_and_midpoint() {
        let s = LineSegment::new(Point2::new(0, 0), Point2::new(30, 40));
        assert_relative_eq!(s.length(), 50.0);
        assert_eq!(s.midpoint(), Point2::new(15.0, 20.0));
    }
}
