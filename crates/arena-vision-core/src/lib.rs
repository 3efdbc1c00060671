//! Core types for the arena-vision ball/wall detection pipeline.
//!
//! This crate is intentionally small. It holds the rasters that flow through
//! the pipeline (color frames and binary masks), the geometric primitives the
//! shape classifiers produce, and the per-cycle detection set. It does *not*
//! depend on any image-processing library or capture backend.

mod detection;
mod image;
mod logger;
mod shapes;

pub use detection::{BallDetection, DetectionSet};
pub use image::{Channel, ColorFrame, Mask};
pub use shapes::{eccentricity, Circle, Contour, EllipseBox, LineSegment};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

pub use nalgebra::Point2;
