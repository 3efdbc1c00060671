use arena_vision_core::{LineSegment, Mask};
use arena_vision_geometry::Geometry;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::params::WallClassifierParams;

/// Per-call counters of the wall classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallReport {
    pub contours: usize,
    pub too_small: usize,
    pub filled: usize,
    pub lines: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallClassification {
    pub walls: Vec<LineSegment>,
    pub report: WallReport,
}

/// Turns a wall-class mask into line segments: large regions are filled into
/// one raster and a probabilistic Hough pass extracts their straight runs.
#[derive(Clone, Debug, Default)]
pub struct WallClassifier {
    params: WallClassifierParams,
}

impl WallClassifier {
    pub fn new(params: WallClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WallClassifierParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, geometry, mask), fields(width = mask.width, height = mask.height))
    )]
    pub fn classify<G: Geometry + ?Sized>(&self, geometry: &G, mask: &Mask) -> WallClassification {
        let mut report = WallReport::default();
        let mut raster = Mask::new(mask.width, mask.height);

        let contours = geometry.find_contours(mask);
        report.contours = contours.len();
        for contour in &contours {
            if contour.len() < self.params.min_contour_points {
                report.too_small += 1;
                continue;
            }
            geometry.fill_contour(&mut raster, contour);
            report.filled += 1;
        }

        let walls = if report.filled > 0 {
            geometry.hough_lines(&raster, &self.params.hough)
        } else {
            Vec::new()
        };
        report.lines = walls.len();
        WallClassification { walls, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_vision_geometry::NativeGeometry;

    #[test]
    fn empty_mask_yields_nothing() {
        let out = WallClassifier::default().classify(&NativeGeometry, &Mask::new(64, 48));
        assert!(out.walls.is_empty());
        assert_eq!(out.report, WallReport::default());
    }

    #[test]
    fn long_bar_becomes_segments() {
        let mut mask = Mask::new(200, 80);
        for y in 30..40 {
            for x in 20..180 {
                mask.set_member(x, y);
            }
        }
        let out = WallClassifier::default().classify(&NativeGeometry, &mask);
        assert_eq!(out.report.filled, 1);
        assert!(!out.walls.is_empty());
        assert_eq!(out.report.lines, out.walls.len());
        for w in &out.walls {
            assert!((30..40).contains(&w.start.y) && (30..40).contains(&w.end.y));
        }
    }

    #[test]
    fn small_patch_is_ignored() {
        let mut mask = Mask::new(40, 40);
        for y in 10..15 {
            for x in 10..15 {
                mask.set_member(x, y);
            }
        }
        let out = WallClassifier::default().classify(&NativeGeometry, &mask);
        assert_eq!(out.report.too_small, 1);
        assert!(out.walls.is_empty());
    }
}
