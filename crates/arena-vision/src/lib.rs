//! Real-time ball and wall detection for arena robots.
//!
//! A background thread pulls frames from a [`CaptureDevice`](capture::CaptureDevice)
//! and publishes immutable snapshots. Each [`Pipeline::tick`] takes the latest
//! snapshot and runs one detection cycle over it:
//!
//! 1. optional box blur,
//! 2. color segmentation into a red ball mask and a blue wall mask,
//! 3. ball classification: contours, ellipse fit, eccentricity gate, and a
//!    Hough circle pass over the rejected residue,
//! 4. wall classification: large contours filled into a raster, then
//!    probabilistic Hough lines.
//!
//! ## Quickstart
//!
//! ```no_run
//! use arena_vision::capture::ImageSequenceDevice;
//! use arena_vision::{Pipeline, PipelineParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let device = ImageSequenceDevice::from_paths(["arena.png"]).with_fps(30.0);
//! let mut pipeline = Pipeline::start(device, PipelineParams::default())?;
//! let detections = pipeline.tick();
//! println!("{} balls, {} walls", detections.balls.len(), detections.walls.len());
//! pipeline.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `arena_vision::core`: frames, masks, shapes and the per-tick `DetectionSet`.
//! - `arena_vision::geometry`: the `Geometry` trait and its native backend.
//! - `arena_vision::detect`: segmentation, classifiers and `PipelineParams`.
//! - `arena_vision::capture`: capture devices and the `FrameSource` thread.
//! - [`Detector`]: one cycle on a caller-supplied frame, no capture attached.
//! - [`scene`]: synthetic arena frames.

pub use arena_vision_capture as capture;
pub use arena_vision_core as core;
pub use arena_vision_detect as detect;
pub use arena_vision_geometry as geometry;

mod detector;
mod error;
mod pipeline;
pub mod scene;

pub use arena_vision_core::{BallDetection, ColorFrame, DetectionSet};
pub use arena_vision_detect::PipelineParams;
pub use detector::{CycleReport, Detector};
pub use error::PipelineError;
pub use pipeline::Pipeline;
