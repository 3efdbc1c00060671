use std::borrow::Cow;

use arena_vision_core::{ColorFrame, DetectionSet};
use arena_vision_detect::{
    segment, smooth, BallClassifier, BallReport, PipelineParams, WallClassifier, WallReport,
};
use arena_vision_geometry::{Geometry, NativeGeometry};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Counters from one detection cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub ball: BallReport,
    pub wall: WallReport,
}

/// One full segment-and-classify cycle, without any capture attached.
#[derive(Debug)]
pub struct Detector<G = NativeGeometry> {
    geometry: G,
    params: PipelineParams,
    ball: BallClassifier,
    wall: WallClassifier,
}

impl Detector<NativeGeometry> {
    pub fn new(params: PipelineParams) -> Self {
        Self::with_geometry(NativeGeometry, params)
    }
}

impl Default for Detector<NativeGeometry> {
    fn default() -> Self {
        Self::new(PipelineParams::default())
    }
}

impl<G: Geometry> Detector<G> {
    pub fn with_geometry(geometry: G, params: PipelineParams) -> Self {
        Self {
            ball: BallClassifier::new(params.ball.clone()),
            wall: WallClassifier::new(params.wall.clone()),
            geometry,
            params,
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Detect balls and walls in `frame`. `frame_sequence` is left unset.
    pub fn process(&self, frame: &ColorFrame) -> DetectionSet {
        self.process_with_report(frame).0
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn process_with_report(&self, frame: &ColorFrame) -> (DetectionSet, CycleReport) {
        let blur = self.params.preprocess.blur_radius;
        let frame: Cow<'_, ColorFrame> = if blur > 0 {
            Cow::Owned(smooth(frame, blur))
        } else {
            Cow::Borrowed(frame)
        };

        let ball_mask = segment(&frame, &self.params.ball_color);
        let wall_mask = segment(&frame, &self.params.wall_color);

        let balls = self.ball.classify(&self.geometry, &ball_mask);
        let walls = self.wall.classify(&self.geometry, &wall_mask);

        let report = CycleReport {
            ball: balls.report,
            wall: walls.report,
        };
        log::debug!(
            "balls: {} contours, {} small, {} degenerate, {} ellipses, {} rejected, {} circles; \
             walls: {} contours, {} small, {} filled, {} lines",
            report.ball.contours,
            report.ball.too_small,
            report.ball.degenerate,
            report.ball.accepted,
            report.ball.rejected,
            report.ball.circles,
            report.wall.contours,
            report.wall.too_small,
            report.wall.filled,
            report.wall.lines,
        );

        let set = DetectionSet {
            frame_sequence: None,
            balls: balls.balls,
            walls: walls.walls,
        };
        (set, report)
    }
}
