use arena_vision_core::{BallDetection, Mask};
use arena_vision_geometry::Geometry;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::params::BallClassifierParams;

/// Per-call counters of the ball classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallReport {
    pub contours: usize,
    pub too_small: usize,
    pub degenerate: usize,
    /// Round enough to be emitted as ellipses.
    pub accepted: usize,
    /// Too eccentric; filled into the residue raster.
    pub rejected: usize,
    /// Circles recovered from the residue.
    pub circles: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BallClassification {
    pub balls: Vec<BallDetection>,
    pub report: BallReport,
}

/// Turns a ball-class mask into ball detections.
///
/// Each contour is fitted with an ellipse. Round fits are balls; the rest are
/// painted into a residue raster that gets one Hough circle pass, which
/// recovers balls whose outline was broken up or merged with clutter.
#[derive(Clone, Debug, Default)]
pub struct BallClassifier {
    params: BallClassifierParams,
}

impl BallClassifier {
    pub fn new(params: BallClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BallClassifierParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, geometry, mask), fields(width = mask.width, height = mask.height))
    )]
    pub fn classify<G: Geometry + ?Sized>(&self, geometry: &G, mask: &Mask) -> BallClassification {
        let mut report = BallReport::default();
        let mut balls = Vec::new();
        let mut residue = Mask::new(mask.width, mask.height);

        let contours = geometry.find_contours(mask);
        report.contours = contours.len();

        for contour in &contours {
            if contour.len() < self.params.min_contour_points {
                report.too_small += 1;
                continue;
            }
            let ellipse = match geometry.fit_ellipse(contour) {
                Ok(e) => e,
                Err(err) => {
                    log::trace!("skipping contour of {} points: {err}", contour.len());
                    report.degenerate += 1;
                    continue;
                }
            };

            let ecc = ellipse.eccentricity();
            log::trace!(
                "contour of {} points: ellipse {:.1}x{:.1} at ({:.1}, {:.1}), eccentricity {:.3}",
                contour.len(),
                ellipse.width,
                ellipse.height,
                ellipse.center.x,
                ellipse.center.y,
                ecc
            );
            if ecc <= self.params.eccentricity_threshold {
                report.accepted += 1;
                balls.push(BallDetection::Ellipse(ellipse));
            } else {
                report.rejected += 1;
                geometry.fill_contour(&mut residue, contour);
            }
        }

        if !residue.is_empty() {
            let circles = geometry.hough_circles(&residue, &self.params.hough);
            report.circles = circles.len();
            balls.extend(circles.into_iter().map(BallDetection::Circle));
        }

        BallClassification { balls, report }
    }
}
