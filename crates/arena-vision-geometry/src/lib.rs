//! Geometric primitives used by the arena-vision shape classifiers.
//!
//! The classifiers only talk to the [`Geometry`] trait, so tests can swap in
//! a recording mock and callers can plug in another backend. [`NativeGeometry`]
//! is the default implementation:
//!
//! - contours and polygon fill come from `imageproc`,
//! - the ellipse fit is a direct least-squares conic fit on `nalgebra`,
//! - both Hough transforms run on plain accumulators in this crate.

mod contours;
mod ellipse;
mod hough_circle;
mod hough_line;
mod params;
mod raster;

use arena_vision_core::{Circle, Contour, EllipseBox, LineSegment, Mask};

pub use params::{HoughCircleParams, HoughLineParams};
pub use raster::{gray_to_mask, mask_to_gray};

/// Why a contour could not be turned into an ellipse.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("ellipse fit needs at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("degenerate contour: {0}")]
    Degenerate(&'static str),
}

/// Image-processing capability the shape classifiers are written against.
pub trait Geometry {
    /// All region boundaries (outer and hole) of the mask's member pixels.
    fn find_contours(&self, mask: &Mask) -> Vec<Contour>;

    /// Least-squares ellipse through the contour points.
    fn fit_ellipse(&self, contour: &Contour) -> Result<EllipseBox, GeometryError>;

    /// Paint the contour and its interior into `raster` as members.
    fn fill_contour(&self, raster: &mut Mask, contour: &Contour);

    fn hough_circles(&self, raster: &Mask, params: &HoughCircleParams) -> Vec<Circle>;

    fn hough_lines(&self, raster: &Mask, params: &HoughLineParams) -> Vec<LineSegment>;
}

/// Pure-Rust [`Geometry`] backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeGeometry;

impl Geometry for NativeGeometry {
    fn find_contours(&self, mask: &Mask) -> Vec<Contour> {
        contours::find_contours(mask)
    }

    fn fit_ellipse(&self, contour: &Contour) -> Result<EllipseBox, GeometryError> {
        ellipse::fit_ellipse(&contour.points)
    }

    fn fill_contour(&self, raster: &mut Mask, contour: &Contour) {
        contours::fill_contour(raster, contour)
    }

    fn hough_circles(&self, raster: &Mask, params: &HoughCircleParams) -> Vec<Circle> {
        hough_circle::hough_circles(raster, params)
    }

    fn hough_lines(&self, raster: &Mask, params: &HoughLineParams) -> Vec<LineSegment> {
        hough_line::hough_lines(raster, params)
    }
}

impl<G: Geometry + ?Sized> Geometry for &G {
    fn find_contours(&self, mask: &Mask) -> Vec<Contour> {
        (**self).find_contours(mask)
    }

    fn fit_ellipse(&self, contour: &Contour) -> Result<EllipseBox, GeometryError> {
        (**self).fit_ellipse(contour)
    }

    fn fill_contour(&self, raster: &mut Mask, contour: &Contour) {
        (**self).fill_contour(raster, contour)
    }

    fn hough_circles(&self, raster: &Mask, params: &HoughCircleParams) -> Vec<Circle> {
        (**self).hough_circles(raster, params)
    }

    fn hough_lines(&self, raster: &Mask, params: &HoughLineParams) -> Vec<LineSegment> {
        (**self).hough_lines(raster, params)
    }
}
