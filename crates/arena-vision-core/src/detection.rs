use serde::{Deserialize, Serialize};

use crate::shapes::{Circle, EllipseBox, LineSegment};

/// Validated ball target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BallDetection {
    /// Contour was round enough for its ellipse fit to be trusted.
    Ellipse(EllipseBox),
    /// Recovered by the circle pass over rejected-contour residue.
    Circle(Circle),
}

impl BallDetection {
    pub fn center(&self) -> nalgebra::Point2<f32> {
        match self {
            BallDetection::Ellipse(e) => e.center,
            BallDetection::Circle(c) => c.center,
        }
    }
}

/// Everything detected in one pipeline cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    /// Capture sequence number of the processed frame; `None` when no frame
    /// had been captured yet.
    pub frame_sequence: Option<u64>,
    pub balls: Vec<BallDetection>,
    pub walls: Vec<LineSegment>,
}

impl DetectionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty() && self.walls.is_empty()
    }

    pub fn ellipses(&self) -> impl Iterator<Item = &EllipseBox> {
        self.balls.iter().filter_map(|b| match b {
            BallDetection::Ellipse(e) => Some(e),
            BallDetection::Circle(_) => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.balls.iter().filter_map(|b| match b {
            BallDetection::Circle(c) => Some(c),
            BallDetection::Ellipse(_) => None,
        })
    }
}
