use std::cell::RefCell;

use arena_vision_core::{
    BallDetection, Circle, ColorFrame, Contour, EllipseBox, LineSegment, Mask, Point2,
};
use arena_vision_detect::{
    segment, BallClassifier, BallClassifierParams, PipelineParams, WallClassifier,
    WallClassifierParams,
};
use arena_vision_geometry::{Geometry, GeometryError, HoughCircleParams, HoughLineParams};

/// Geometry stand-in that hands out canned contours and records what the
/// classifiers ask of it.
#[derive(Default)]
struct RecordingGeometry {
    contours: Vec<Contour>,
    /// Fit result keyed by contour length: `(width, height)` or degenerate.
    fits: Vec<(usize, Option<(f32, f32)>)>,
    circles: Vec<Circle>,
    lines: Vec<LineSegment>,
    fitted: RefCell<Vec<usize>>,
    filled: RefCell<Vec<usize>>,
    circle_passes: RefCell<usize>,
    line_passes: RefCell<usize>,
}

impl RecordingGeometry {
    fn with_contour_sizes(sizes: &[usize]) -> Self {
        Self {
            contours: sizes.iter().map(|&n| contour_of(n)).collect(),
            ..Self::default()
        }
    }
}

fn contour_of(n: usize) -> Contour {
    Contour::new((0..n as i32).map(|i| Point2::new(i, i % 3)).collect())
}

impl Geometry for RecordingGeometry {
    fn find_contours(&self, _mask: &Mask) -> Vec<Contour> {
        self.contours.clone()
    }

    fn fit_ellipse(&self, contour: &Contour) -> Result<EllipseBox, GeometryError> {
        self.fitted.borrow_mut().push(contour.len());
        let fit = self
            .fits
            .iter()
            .find(|(n, _)| *n == contour.len())
            .and_then(|(_, f)| *f);
        match fit {
            Some((width, height)) => Ok(EllipseBox {
                center: Point2::new(10.0, 20.0),
                width,
                height,
                angle: 0.0,
            }),
            None => Err(GeometryError::Degenerate("mock")),
        }
    }

    fn fill_contour(&self, raster: &mut Mask, contour: &Contour) {
        self.filled.borrow_mut().push(contour.len());
        raster.set_member(0, 0);
    }

    fn hough_circles(&self, _raster: &Mask, _params: &HoughCircleParams) -> Vec<Circle> {
        *self.circle_passes.borrow_mut() += 1;
        self.circles.clone()
    }

    fn hough_lines(&self, _raster: &Mask, _params: &HoughLineParams) -> Vec<LineSegment> {
        *self.line_passes.borrow_mut() += 1;
        self.lines.clone()
    }
}

#[test]
fn short_contours_never_reach_ellipse_fit() {
    let mut geometry = RecordingGeometry::with_contour_sizes(&[5, 20, 21, 40]);
    geometry.fits = vec![(21, Some((30.0, 31.0))), (40, Some((30.0, 30.0)))];

    let out = BallClassifier::default().classify(&geometry, &Mask::new(32, 32));
    assert_eq!(*geometry.fitted.borrow(), vec![21, 40]);
    assert_eq!(out.report.too_small, 2);
    assert_eq!(out.report.accepted, 2);
    assert_eq!(out.balls.len(), 2);
    assert_eq!(*geometry.circle_passes.borrow(), 0);
}

#[test]
fn eccentric_contours_feed_the_circle_pass() {
    let mut geometry = RecordingGeometry::with_contour_sizes(&[30, 60, 90]);
    geometry.fits = vec![
        (30, Some((20.0, 20.0))),
        // (60 - 40) / 100 = 0.2
        (60, Some((40.0, 60.0))),
        (90, None),
    ];
    geometry.circles = vec![Circle {
        center: Point2::new(5.0, 5.0),
        radius: 12.0,
    }];

    let out = BallClassifier::default().classify(&geometry, &Mask::new(32, 32));
    assert_eq!(*geometry.filled.borrow(), vec![60]);
    assert_eq!(*geometry.circle_passes.borrow(), 1);
    assert_eq!(out.report.degenerate, 1);
    assert_eq!(out.report.rejected, 1);
    assert_eq!(out.report.circles, 1);
    assert!(matches!(out.balls[0], BallDetection::Ellipse(_)));
    assert!(matches!(out.balls[1], BallDetection::Circle(_)));
}

#[test]
fn eccentricity_threshold_is_inclusive() {
    let mut geometry = RecordingGeometry::with_contour_sizes(&[30]);
    // (55 - 45) / 100 = 0.1 exactly.
    geometry.fits = vec![(30, Some((45.0, 55.0)))];
    let params = BallClassifierParams {
        eccentricity_threshold: 0.1,
        ..BallClassifierParams::default()
    };
    let out = BallClassifier::new(params).classify(&geometry, &Mask::new(8, 8));
    assert_eq!(out.report.accepted, 1);
    assert!(geometry.filled.borrow().is_empty());
}

#[test]
fn short_contours_never_reach_wall_raster() {
    let mut geometry = RecordingGeometry::with_contour_sizes(&[10, 49, 50, 300]);
    geometry.lines = vec![LineSegment::new(Point2::new(0, 0), Point2::new(100, 0))];

    let out = WallClassifier::default().classify(&geometry, &Mask::new(32, 32));
    assert_eq!(*geometry.filled.borrow(), vec![50, 300]);
    assert!(geometry.fitted.borrow().is_empty());
    assert_eq!(out.report.too_small, 2);
    assert_eq!(out.walls.len(), 1);
    assert_eq!(*geometry.line_passes.borrow(), 1);
}

#[test]
fn wall_cutoff_is_configurable() {
    let geometry = RecordingGeometry::with_contour_sizes(&[10, 49]);
    let params = WallClassifierParams {
        min_contour_points: 10,
        ..WallClassifierParams::default()
    };
    WallClassifier::new(params).classify(&geometry, &Mask::new(8, 8));
    assert_eq!(*geometry.filled.borrow(), vec![10, 49]);
}

#[test]
fn all_failing_frame_gives_no_detections() {
    let params = PipelineParams::default();
    let frame = ColorFrame::filled(80, 60, [40, 40, 40]);
    let mask = segment(&frame, &params.ball_color);
    assert!(mask.is_empty());

    let geometry = RecordingGeometry::default();
    let balls = BallClassifier::new(params.ball).classify(&geometry, &mask);
    let walls = WallClassifier::new(params.wall).classify(&geometry, &mask);
    assert!(balls.balls.is_empty());
    assert!(walls.walls.is_empty());
    assert_eq!(*geometry.circle_passes.borrow(), 0);
    assert_eq!(*geometry.line_passes.borrow(), 0);
}
